//! Temp-file-then-rename writes.
//!
//! An [`AtomicFile`] buffers its contents in a temporary file created next to
//! the destination. Only [`AtomicFile::commit`] renames it over the final
//! name; dropping it earlier deletes the temporary file and leaves whatever
//! was at the destination untouched.
//!
//! A replaced file keeps its permissions. A new file gets `0644` on Unix
//! rather than the owner-only mode temporary files are created with.

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

/// A file that becomes visible under its final name only on commit.
#[derive(Debug)]
pub struct AtomicFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl AtomicFile {
    /// Start an atomic write to `target`.
    ///
    /// The parent directory is created if missing. The temporary file lives
    /// in the same directory so the final rename never crosses filesystems.
    pub fn create(target: &Path) -> io::Result<Self> {
        let dir = target.parent().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no parent directory", target.display()),
            )
        })?;
        fs::create_dir_all(dir)?;
        let temp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(dir)?;

        let permissions = match fs::metadata(target) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => default_permissions(),
            Err(e) => return Err(e),
        };
        if let Some(permissions) = permissions {
            temp.as_file().set_permissions(permissions)?;
        }

        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    /// The destination path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush, sync, and rename the temporary file over the destination.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        self.temp.flush()?;
        self.temp.as_file().sync_all()?;
        let target = self.target;
        self.temp.persist(&target).map_err(|e| e.error)?;
        debug!(path = %target.display(), "atomic write committed");
        Ok(target)
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}
