use super::{ReportError, ReportKind};
use std::path::{Path, PathBuf};

pub const DEFAULT_TASK_REPORTS_DIR: &str = ".task-reports";
pub const TASK_REPORTS_BASE_ENV: &str = "TASK_REPORTS_BASE";

/// Owns the on-disk layout of the report store. All path derivation lives
/// here so no caller hardcodes the directory scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub root: PathBuf,
}

impl ReportPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn task_dir(&self, task_id: &str) -> PathBuf {
        self.root.join(task_id)
    }

    pub fn reports_dir(&self, task_id: &str) -> PathBuf {
        self.task_dir(task_id).join("reports")
    }

    pub fn report_path(&self, task_id: &str, kind: ReportKind) -> PathBuf {
        self.reports_dir(task_id)
            .join(format!("{}.md", kind.as_str()))
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("logs/taskgate.log")
    }
}

/// Resolves the default task-reports root: the `TASK_REPORTS_BASE` env
/// override when set, else `.task-reports` under the nearest ancestor
/// containing `.git`, else `.task-reports` under the current directory.
pub fn default_task_root() -> Result<PathBuf, ReportError> {
    if let Some(base) = std::env::var_os(TASK_REPORTS_BASE_ENV) {
        return Ok(PathBuf::from(base));
    }
    let cwd = std::env::current_dir()
        .map_err(|source| ReportError::CurrentDirUnavailable { source })?;
    Ok(repository_root(&cwd)
        .unwrap_or(cwd)
        .join(DEFAULT_TASK_REPORTS_DIR))
}

fn repository_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}
