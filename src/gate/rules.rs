use super::GateError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Classifier output bucket for a candidate command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateAction {
    Allow,
    Warn,
    Block,
}

impl std::fmt::Display for GateAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateAction::Allow => write!(f, "allow"),
            GateAction::Warn => write!(f, "warn"),
            GateAction::Block => write!(f, "block"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteScope {
    /// Target is `/` or `/*`: unrecoverable regardless of intent.
    FilesystemRoot,
    /// Target resolves outside the project root.
    OutsideProjectRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlPattern {
    DropTable,
    TruncateTable,
    DeleteWithoutWhere,
}

/// Predicate half of a gate rule. Structural matchers exist where substring
/// matching cannot express the condition (flag order, path scoping, missing
/// SQL clauses); everything else is a substring or command-prefix match so
/// rule files stay declarative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "match")]
pub enum RuleMatcher {
    /// Case-insensitive substring match on the raw command text.
    Substring { needle: String },
    /// Token-boundary prefix match, e.g. `git status` matches
    /// `git status --short` but not `git status-extra`.
    CommandPrefix { prefix: String },
    /// `rm` invoked with both recursive and force flags, targeting the
    /// given scope.
    ForcedRecursiveDelete { scope: DeleteScope },
    /// `git push` carrying `--force`/`-f` and naming one of the listed
    /// protected branches.
    ForcePushProtectedBranch { branches: Vec<String> },
    /// Destructive SQL statement without a scoping clause.
    UnscopedSql { pattern: SqlPattern },
}

/// One entry of the ordered rule table. Evaluation is first-match-wins, so
/// specializations must be listed before their more general parents and
/// block rules before warn rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRule {
    pub id: String,
    #[serde(flatten)]
    pub matcher: RuleMatcher,
    pub action: GateAction,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

/// The verdict handed to the shell-execution layer. Producing it is the
/// classifier's only effect; honoring block/warn is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub action: GateAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

fn rule(
    id: &str,
    matcher: RuleMatcher,
    action: GateAction,
    rationale: &str,
    alternative: Option<&str>,
) -> GateRule {
    GateRule {
        id: id.to_string(),
        matcher,
        action,
        rationale: rationale.to_string(),
        alternative: alternative.map(str::to_string),
    }
}

/// Built-in rule table. Block rules come first so that a command matching
/// both a block and a warn pattern resolves to block.
pub fn default_rules() -> Vec<GateRule> {
    vec![
        rule(
            "fs.delete_root",
            RuleMatcher::ForcedRecursiveDelete {
                scope: DeleteScope::FilesystemRoot,
            },
            GateAction::Block,
            "recursive forced delete of a filesystem root is unrecoverable",
            None,
        ),
        rule(
            "fs.format_filesystem",
            RuleMatcher::Substring {
                needle: "mkfs.".to_string(),
            },
            GateAction::Block,
            "formatting a filesystem destroys everything on the device",
            None,
        ),
        rule(
            "fs.disk_wipe",
            RuleMatcher::Substring {
                needle: "dd if=/dev/zero".to_string(),
            },
            GateAction::Block,
            "zero-filling a device destroys everything on it",
            None,
        ),
        rule(
            "git.force_push_protected",
            RuleMatcher::ForcePushProtectedBranch {
                branches: vec!["main".to_string(), "master".to_string()],
            },
            GateAction::Warn,
            "force-pushing a protected branch rewrites shared history",
            Some("git push --force-with-lease"),
        ),
        rule(
            "git.hard_reset",
            RuleMatcher::Substring {
                needle: "git reset --hard".to_string(),
            },
            GateAction::Warn,
            "hard reset discards uncommitted work with no safety reference",
            Some("git stash push, then reset"),
        ),
        rule(
            "git.forced_clean",
            RuleMatcher::Substring {
                needle: "git clean -f".to_string(),
            },
            GateAction::Warn,
            "forced clean deletes untracked files irreversibly",
            Some("git clean -n to preview what would be removed"),
        ),
        rule(
            "perm.world_writable_recursive",
            RuleMatcher::Substring {
                needle: "chmod -r 777".to_string(),
            },
            GateAction::Warn,
            "recursive world-writable permissions expose the whole tree",
            Some("scope the mode change to the files that need it"),
        ),
        rule(
            "perm.world_writable",
            RuleMatcher::Substring {
                needle: "chmod 777".to_string(),
            },
            GateAction::Warn,
            "world-writable permissions let any local user modify the file",
            Some("use the narrowest mode that works, e.g. 755 or 644"),
        ),
        rule(
            "priv.elevated",
            RuleMatcher::Substring {
                needle: "sudo ".to_string(),
            },
            GateAction::Warn,
            "runs with elevated privileges",
            Some("run without sudo if the operation allows it"),
        ),
        rule(
            "sql.drop_table",
            RuleMatcher::UnscopedSql {
                pattern: SqlPattern::DropTable,
            },
            GateAction::Warn,
            "dropping a table destroys its data and schema",
            Some("rename or back up the table first"),
        ),
        rule(
            "sql.truncate",
            RuleMatcher::UnscopedSql {
                pattern: SqlPattern::TruncateTable,
            },
            GateAction::Warn,
            "truncate removes every row without a scoping clause",
            None,
        ),
        rule(
            "sql.delete_without_where",
            RuleMatcher::UnscopedSql {
                pattern: SqlPattern::DeleteWithoutWhere,
            },
            GateAction::Warn,
            "delete without a where clause removes every row",
            Some("add a where clause scoping the delete"),
        ),
        rule(
            "fs.delete_outside_root",
            RuleMatcher::ForcedRecursiveDelete {
                scope: DeleteScope::OutsideProjectRoot,
            },
            GateAction::Warn,
            "recursive forced delete targets a path outside the project root",
            Some("target a path inside the project root"),
        ),
        rule(
            "git.inspect_status",
            RuleMatcher::CommandPrefix {
                prefix: "git status".to_string(),
            },
            GateAction::Allow,
            "read-only repository inspection",
            None,
        ),
        rule(
            "git.inspect_log",
            RuleMatcher::CommandPrefix {
                prefix: "git log".to_string(),
            },
            GateAction::Allow,
            "read-only repository inspection",
            None,
        ),
        rule(
            "git.inspect_diff",
            RuleMatcher::CommandPrefix {
                prefix: "git diff".to_string(),
            },
            GateAction::Allow,
            "read-only repository inspection",
            None,
        ),
        rule(
            "git.stage",
            RuleMatcher::CommandPrefix {
                prefix: "git add".to_string(),
            },
            GateAction::Allow,
            "incremental staging",
            None,
        ),
        rule(
            "git.commit",
            RuleMatcher::CommandPrefix {
                prefix: "git commit".to_string(),
            },
            GateAction::Allow,
            "ordinary commit",
            None,
        ),
        rule(
            "git.push",
            RuleMatcher::CommandPrefix {
                prefix: "git push".to_string(),
            },
            GateAction::Allow,
            "ordinary push without force",
            None,
        ),
        rule(
            "test.cargo",
            RuleMatcher::CommandPrefix {
                prefix: "cargo test".to_string(),
            },
            GateAction::Allow,
            "test execution",
            None,
        ),
        rule(
            "test.npm",
            RuleMatcher::CommandPrefix {
                prefix: "npm test".to_string(),
            },
            GateAction::Allow,
            "test execution",
            None,
        ),
        rule(
            "test.pytest",
            RuleMatcher::CommandPrefix {
                prefix: "pytest".to_string(),
            },
            GateAction::Allow,
            "test execution",
            None,
        ),
    ]
}

/// Loads extra rules from a YAML file so new dangerous patterns can be added
/// without touching the evaluation engine.
pub fn load_rules_file(path: &Path) -> Result<Vec<GateRule>, GateError> {
    let raw = std::fs::read_to_string(path).map_err(|source| GateError::ReadRules {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| GateError::ParseRules {
        path: path.display().to_string(),
        source,
    })
}
