pub mod freshness;
pub mod kind;
pub mod paths;
pub mod query;
pub mod store;
pub mod wait;

pub use freshness::invalidate;
pub use kind::ReportKind;
pub use paths::{
    default_task_root, ReportPaths, DEFAULT_TASK_REPORTS_DIR, TASK_REPORTS_BASE_ENV,
};
pub use query::read_report;
pub use store::ReportStore;
pub use wait::{await_all, await_all_until, DEFAULT_POLL_INTERVAL};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("unknown report kind `{kind}`")]
    InvalidKind { kind: String },
    #[error("report `{kind}` for task `{task_id}` not found at {path}")]
    NotFound {
        task_id: String,
        kind: String,
        path: String,
    },
    #[error("report `{kind}` for task `{task_id}` at {path} has no content")]
    EmptyReport {
        task_id: String,
        kind: String,
        path: String,
    },
    #[error("wait requires at least one report path")]
    EmptyWaitSet,
    #[error("wait deadline of {deadline_ms}ms elapsed before all reports appeared")]
    DeadlineExceeded { deadline_ms: u128 },
    #[error("wait was stopped before all reports appeared")]
    WaitStopped,
    #[error("failed to resolve current directory: {source}")]
    CurrentDirUnavailable {
        #[source]
        source: std::io::Error,
    },
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_error(path: &std::path::Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.display().to_string(),
        source,
    }
}
