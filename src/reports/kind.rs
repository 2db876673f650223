use super::ReportError;
use serde::{Deserialize, Serialize};

/// The closed set of report tags a pipeline stage may produce. Requests for
/// any other tag are rejected before the filesystem is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Requirements,
    CodebaseAnalysis,
    Plan,
    TestsDesign,
    TestsReview,
    Implementation,
    Stabilization,
    Acceptance,
    Performance,
    Security,
    Refactoring,
    CodeReview,
    Documentation,
}

impl ReportKind {
    pub const ALL: [ReportKind; 13] = [
        ReportKind::Requirements,
        ReportKind::CodebaseAnalysis,
        ReportKind::Plan,
        ReportKind::TestsDesign,
        ReportKind::TestsReview,
        ReportKind::Implementation,
        ReportKind::Stabilization,
        ReportKind::Acceptance,
        ReportKind::Performance,
        ReportKind::Security,
        ReportKind::Refactoring,
        ReportKind::CodeReview,
        ReportKind::Documentation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Requirements => "requirements",
            ReportKind::CodebaseAnalysis => "codebase-analysis",
            ReportKind::Plan => "plan",
            ReportKind::TestsDesign => "tests-design",
            ReportKind::TestsReview => "tests-review",
            ReportKind::Implementation => "implementation",
            ReportKind::Stabilization => "stabilization",
            ReportKind::Acceptance => "acceptance",
            ReportKind::Performance => "performance",
            ReportKind::Security => "security",
            ReportKind::Refactoring => "refactoring",
            ReportKind::CodeReview => "code-review",
            ReportKind::Documentation => "documentation",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ReportError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| ReportError::InvalidKind {
                kind: raw.to_string(),
            })
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
