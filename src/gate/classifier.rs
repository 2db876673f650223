use super::rules::{default_rules, DeleteScope, GateAction, GateRule, RuleMatcher, SqlPattern};
use super::Verdict;
use std::path::{Component, Path, PathBuf};

/// Ordered-rule classifier for candidate shell commands. Stateless: the
/// verdict depends only on the command text and the project root. It never
/// executes or mutates anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateEngine {
    rules: Vec<GateRule>,
}

impl GateEngine {
    pub fn new(rules: Vec<GateRule>) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    /// Custom rules are evaluated before the built-in table, so a stricter
    /// site-specific rule can override a default.
    pub fn with_extra_rules(extra: Vec<GateRule>) -> Self {
        let mut rules = extra;
        rules.extend(default_rules());
        Self::new(rules)
    }

    /// First matching rule wins. Commands matching no rule are allowed: this
    /// is an advisory guard, not a sandbox, so unknown-but-unflagged
    /// commands pass.
    pub fn classify(&self, command: &str, project_root: &Path) -> Verdict {
        for rule in &self.rules {
            if matcher_applies(&rule.matcher, command, project_root) {
                return Verdict {
                    action: rule.action,
                    rule_id: Some(rule.id.clone()),
                    rationale: rule.rationale.clone(),
                    alternative: rule.alternative.clone(),
                };
            }
        }
        Verdict {
            action: GateAction::Allow,
            rule_id: None,
            rationale: "no safety rule matched; allowed by default".to_string(),
            alternative: None,
        }
    }
}

fn matcher_applies(matcher: &RuleMatcher, command: &str, project_root: &Path) -> bool {
    let lowered = command.to_lowercase();
    match matcher {
        RuleMatcher::Substring { needle } => lowered.contains(&needle.to_lowercase()),
        RuleMatcher::CommandPrefix { prefix } => command_has_prefix(command.trim(), prefix),
        RuleMatcher::ForcedRecursiveDelete { scope } => {
            forced_recursive_delete_matches(command, *scope, project_root)
        }
        RuleMatcher::ForcePushProtectedBranch { branches } => {
            force_push_names_protected_branch(command, branches)
        }
        RuleMatcher::UnscopedSql { pattern } => sql_pattern_matches(&lowered, *pattern),
    }
}

fn command_has_prefix(command: &str, prefix: &str) -> bool {
    let Some(rest) = command.strip_prefix(prefix) else {
        return false;
    };
    rest.is_empty() || rest.starts_with(char::is_whitespace)
}

fn sql_pattern_matches(lowered: &str, pattern: SqlPattern) -> bool {
    match pattern {
        SqlPattern::DropTable => lowered.contains("drop table"),
        SqlPattern::TruncateTable => truncate_targets_identifier(lowered),
        SqlPattern::DeleteWithoutWhere => {
            lowered.contains("delete from") && !lowered.contains(" where ")
        }
    }
}

/// SQL `truncate` names a table; the coreutils `truncate` takes a `-s`/
/// `--size` flag first. Require either the `table` keyword or a bare
/// identifier after `truncate` so log-file truncation is not flagged as an
/// unscoped statement.
fn truncate_targets_identifier(lowered: &str) -> bool {
    if lowered.contains("truncate table") {
        return true;
    }
    let mut tokens = lowered.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "truncate" {
            return tokens.next().is_some_and(|next| !next.starts_with('-'));
        }
    }
    false
}

/// Finds an `rm` invocation carrying both recursive and force flags and
/// returns its non-flag operands. Wrappers such as `sudo` or `env` in front
/// of `rm` are tolerated because the scan looks for the `rm` token itself.
fn forced_delete_targets(command: &str) -> Option<Vec<String>> {
    let tokens: Vec<&str> = command.split_whitespace().collect();
    let rm_index = tokens.iter().position(|token| *token == "rm")?;

    let mut recursive = false;
    let mut force = false;
    let mut targets = Vec::new();
    for token in &tokens[rm_index + 1..] {
        if *token == "--recursive" {
            recursive = true;
        } else if *token == "--force" {
            force = true;
        } else if token.starts_with('-') && token.len() > 1 && !token.starts_with("--") {
            recursive |= token.contains('r') || token.contains('R');
            force |= token.contains('f');
        } else if !token.starts_with("--") {
            targets.push((*token).to_string());
        }
    }

    if recursive && force && !targets.is_empty() {
        Some(targets)
    } else {
        None
    }
}

fn forced_recursive_delete_matches(command: &str, scope: DeleteScope, project_root: &Path) -> bool {
    let Some(targets) = forced_delete_targets(command) else {
        return false;
    };
    match scope {
        DeleteScope::FilesystemRoot => targets
            .iter()
            .any(|target| target == "/" || target == "/*"),
        DeleteScope::OutsideProjectRoot => targets
            .iter()
            .any(|target| target_escapes_root(target, project_root)),
    }
}

/// Lexical containment check: no filesystem access, so the verdict stays a
/// pure function of its inputs. Relative targets are resolved against the
/// project root; `~` cannot be resolved without the environment and is
/// treated as outside.
fn target_escapes_root(target: &str, project_root: &Path) -> bool {
    if target == "~" || target.starts_with("~/") {
        return true;
    }
    let trimmed = target.trim_end_matches('*');
    let candidate = Path::new(trimmed);
    let resolved = if candidate.is_absolute() {
        normalize_lexical(candidate)
    } else {
        normalize_lexical(&project_root.join(candidate))
    };
    let root = normalize_lexical(project_root);
    !resolved.starts_with(&root)
}

fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            // `/..` is `/`: an absolute path saturates at the root instead
            // of accumulating literal `..` components.
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(Component::ParentDir),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

fn force_push_names_protected_branch(command: &str, branches: &[String]) -> bool {
    let tokens: Vec<&str> = command.split_whitespace().collect();
    let Some(git_index) = tokens.iter().position(|token| *token == "git") else {
        return false;
    };
    let is_push = tokens[git_index + 1..]
        .iter()
        .find(|token| !token.starts_with('-'))
        .is_some_and(|token| *token == "push");
    if !is_push {
        return false;
    }
    let forced = tokens
        .iter()
        .any(|token| *token == "--force" || *token == "-f");
    if !forced {
        return false;
    }
    tokens.iter().any(|token| {
        branches
            .iter()
            .any(|branch| token == branch || token.ends_with(&format!(":{branch}")))
    })
}
