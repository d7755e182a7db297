//! Locked persistence of remote names.

use tracing::debug;
use vcs_refs::{write_file, RefTable};

use crate::config::RemoteNamesConfig;
use crate::error::SyncResult;
use crate::traits::MetadataStore;
use crate::types::{SaveReport, SaveRequest};

/// Rewrite the remote-name files for `request.remote` under the write lock.
///
/// Branches are written before bookmarks. Each file is replaced atomically,
/// but the pair is not: if the bookmarks write fails, the new branches file
/// stays. Any error stops the remaining writes and the lock is released on
/// the way out.
pub fn save_remote_names<R: MetadataStore + ?Sized>(
    repo: &R,
    config: &RemoteNamesConfig,
    request: SaveRequest,
) -> SyncResult<SaveReport> {
    let _guard = repo.acquire_write_lock()?;
    let dir = repo.metadata_path(&[&config.dir_name]);
    let mut report = SaveReport::default();

    let tables = [
        request.branches.map(RefTable::Branches),
        request.bookmarks.map(RefTable::Bookmarks),
    ];
    for table in tables.into_iter().flatten() {
        let path = write_file(&dir, &request.remote, &table)?;
        report.written.push(path);
    }

    debug!(
        remote = %request.remote,
        files = report.written.len(),
        "remote names saved"
    );
    Ok(report)
}
