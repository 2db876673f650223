use std::path::Path;
use taskgate::gate::{GateAction, GateEngine};

fn classify(command: &str) -> GateAction {
    GateEngine::with_default_rules()
        .classify(command, Path::new("/project"))
        .action
}

#[test]
fn recursive_forced_delete_of_filesystem_roots_is_blocked() {
    assert_eq!(classify("rm -rf /"), GateAction::Block);
    assert_eq!(classify("rm -rf /*"), GateAction::Block);
    assert_eq!(classify("sudo rm -rf /"), GateAction::Block);
    assert_eq!(classify("rm -fr /"), GateAction::Block);
}

#[test]
fn block_wins_over_warn_when_both_patterns_match() {
    // `sudo` alone warns; the root delete must still block.
    let verdict =
        GateEngine::with_default_rules().classify("sudo rm -rf /", Path::new("/project"));
    assert_eq!(verdict.action, GateAction::Block);
    assert_eq!(verdict.rule_id.as_deref(), Some("fs.delete_root"));
}

#[test]
fn destructive_but_sometimes_legitimate_commands_warn() {
    assert_eq!(classify("git push --force origin main"), GateAction::Warn);
    assert_eq!(classify("git push -f origin master"), GateAction::Warn);
    assert_eq!(classify("git reset --hard"), GateAction::Warn);
    assert_eq!(classify("git clean -fdx"), GateAction::Warn);
    assert_eq!(classify("chmod -R 777 ."), GateAction::Warn);
    assert_eq!(classify("sudo apt install jq"), GateAction::Warn);
    assert_eq!(classify("DROP TABLE users;"), GateAction::Warn);
    assert_eq!(classify("TRUNCATE sessions;"), GateAction::Warn);
    assert_eq!(classify("DELETE FROM users;"), GateAction::Warn);
}

#[test]
fn scoped_sql_deletes_pass() {
    assert_eq!(
        classify("DELETE FROM users WHERE id = 42;"),
        GateAction::Allow
    );
}

#[test]
fn coreutils_truncate_is_not_mistaken_for_sql() {
    assert_eq!(classify("truncate -s 0 build.log"), GateAction::Allow);
    assert_eq!(classify("truncate --size=0 build.log"), GateAction::Allow);
    assert_eq!(classify("TRUNCATE TABLE sessions;"), GateAction::Warn);
}

#[test]
fn forced_delete_respects_project_root_relativity() {
    let engine = GateEngine::with_default_rules();
    let root = Path::new("/project");

    assert_eq!(
        engine.classify("rm -rf ./build", root).action,
        GateAction::Allow
    );
    assert_eq!(
        engine.classify("rm -rf /project/target", root).action,
        GateAction::Allow
    );

    let outside = engine.classify("rm -rf /var/lib/data", root);
    assert_eq!(outside.action, GateAction::Warn);
    assert_eq!(outside.rule_id.as_deref(), Some("fs.delete_outside_root"));

    let escape = engine.classify("rm -rf ../sibling", root);
    assert_eq!(escape.action, GateAction::Warn);
}

#[test]
fn excess_parent_segments_collapse_to_the_root_before_scoping() {
    let engine = GateEngine::with_default_rules();
    let root = Path::new("/project");

    // `/project/../../project/target` is `/project/target`: inside the root,
    // so it falls through to allow rather than warning spuriously.
    let verdict = engine.classify("rm -rf /project/../../project/target", root);
    assert_eq!(verdict.action, GateAction::Allow);

    let verdict = engine.classify("rm -rf /../etc", root);
    assert_eq!(verdict.action, GateAction::Warn);
    assert_eq!(verdict.rule_id.as_deref(), Some("fs.delete_outside_root"));
}

#[test]
fn the_enumerated_safe_set_is_allowed() {
    assert_eq!(classify("git status"), GateAction::Allow);
    assert_eq!(classify("git log --oneline -20"), GateAction::Allow);
    assert_eq!(classify("git diff HEAD~1"), GateAction::Allow);
    assert_eq!(classify("git add src/lib.rs"), GateAction::Allow);
    assert_eq!(classify("git commit -m 'wire the store'"), GateAction::Allow);
    assert_eq!(classify("git push origin feature/handoff"), GateAction::Allow);
    assert_eq!(classify("cargo test --workspace"), GateAction::Allow);
    assert_eq!(classify("pytest tests/"), GateAction::Allow);
}

#[test]
fn unknown_commands_default_to_allow_with_a_default_rationale() {
    let verdict = GateEngine::with_default_rules()
        .classify("make bootstrap", Path::new("/project"));
    assert_eq!(verdict.action, GateAction::Allow);
    assert!(verdict.rule_id.is_none());
    assert!(verdict.rationale.contains("allowed by default"));
}

#[test]
fn force_push_without_a_protected_branch_falls_through_to_allow() {
    assert_eq!(
        classify("git push --force origin feature/spike"),
        GateAction::Allow
    );
    assert_eq!(
        classify("git push --force-with-lease origin main"),
        GateAction::Allow
    );
}

#[test]
fn verdicts_carry_rationale_and_safer_alternative() {
    let verdict = GateEngine::with_default_rules()
        .classify("git push --force origin main", Path::new("/project"));
    assert_eq!(verdict.action, GateAction::Warn);
    assert_eq!(verdict.rule_id.as_deref(), Some("git.force_push_protected"));
    assert!(!verdict.rationale.is_empty());
    assert_eq!(
        verdict.alternative.as_deref(),
        Some("git push --force-with-lease")
    );
}
