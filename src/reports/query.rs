use super::{io_error, ReportError, ReportKind, ReportStore};
use std::fs;

/// On-demand lookup of a single typed report. The kind string is validated
/// against the closed set before any I/O, so an invalid kind is reported as
/// such even when a file happens to exist at the derived path. A missing
/// file is a distinct not-found condition. Content is returned unmodified;
/// semantic interpretation belongs to the caller.
pub fn read_report(store: &ReportStore, task_id: &str, kind: &str) -> Result<String, ReportError> {
    let kind = ReportKind::parse(kind)?;
    let path = store.path_for(task_id, kind);
    if !path.is_file() {
        return Err(ReportError::NotFound {
            task_id: task_id.to_string(),
            kind: kind.to_string(),
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
    if content.trim().is_empty() {
        return Err(ReportError::EmptyReport {
            task_id: task_id.to_string(),
            kind: kind.to_string(),
            path: path.display().to_string(),
        });
    }
    Ok(content)
}
