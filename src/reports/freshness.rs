use super::{io_error, ReportError};
use crate::shared::fs_atomic::remove_if_present;
use std::path::{Path, PathBuf};

/// Deletes every listed report file if present, so a wait that starts later
/// can never observe a leftover result from an earlier run. Absence of a file
/// is not an error; the call is idempotent. Must complete before the
/// corresponding worker is launched; sequencing is the caller's contract.
///
/// Returns the paths that were actually removed.
pub fn invalidate<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, ReportError> {
    let mut removed = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if remove_if_present(path).map_err(|source| io_error(path, source))? {
            removed.push(path.to_path_buf());
        }
    }
    Ok(removed)
}
