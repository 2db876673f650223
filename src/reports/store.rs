use super::{io_error, ReportError, ReportKind, ReportPaths};
use crate::shared::fs_atomic::atomic_write_file;
use std::path::PathBuf;

/// Handle to the per-task report directory. Each (task, kind) pair maps to
/// exactly one file; a write replaces prior content entirely. Two writers
/// racing on the same pair resolve last-writer-wins through the atomic
/// rename; the workflow convention of one designated writer per stage is not
/// enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStore {
    paths: ReportPaths,
}

impl ReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: ReportPaths::new(root),
        }
    }

    pub fn paths(&self) -> &ReportPaths {
        &self.paths
    }

    /// Computes where the report would live. Never creates the file.
    pub fn path_for(&self, task_id: &str, kind: ReportKind) -> PathBuf {
        self.paths.report_path(task_id, kind)
    }

    pub fn exists(&self, task_id: &str, kind: ReportKind) -> bool {
        self.path_for(task_id, kind).is_file()
    }

    /// Writes the report atomically relative to readers: a concurrent wait
    /// observes either no file or the complete content, never a partial one.
    /// Content is validated only for non-emptiness.
    pub fn write(
        &self,
        task_id: &str,
        kind: ReportKind,
        content: &str,
    ) -> Result<PathBuf, ReportError> {
        let path = self.path_for(task_id, kind);
        if content.trim().is_empty() {
            return Err(ReportError::EmptyReport {
                task_id: task_id.to_string(),
                kind: kind.to_string(),
                path: path.display().to_string(),
            });
        }
        atomic_write_file(&path, content.as_bytes()).map_err(|source| io_error(&path, source))?;
        Ok(path)
    }
}
