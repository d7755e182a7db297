//! Reading and writing remote-name files on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::atomic::AtomicFile;
use crate::codec::{decode, encode};
use crate::error::Result;
use crate::types::{RefKind, RefTable};

/// Replace `dir/<kind>` with `remote`'s names.
///
/// Encoding happens before the temporary file is created, so invalid input
/// never touches the disk. The previous file stays in place until the new
/// one is complete.
pub fn write_file(dir: &Path, remote: &str, table: &RefTable) -> Result<PathBuf> {
    let bytes = encode(remote, table)?;
    let path = dir.join(table.kind().file_name());

    let mut file = AtomicFile::create(&path)?;
    file.write_all(&bytes)?;
    let path = file.commit()?;

    debug!(
        path = %path.display(),
        remote,
        kind = %table.kind(),
        names = table.len(),
        bytes = bytes.len(),
        "wrote remote names"
    );
    Ok(path)
}

/// Read `dir/<kind>`, grouped by remote path.
///
/// A missing file means nothing has been recorded yet and reads as empty.
pub fn read_file(dir: &Path, kind: RefKind) -> Result<BTreeMap<String, RefTable>> {
    let path = dir.join(kind.file_name());
    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };
    decode(kind, &data)
}
