use crate::gate::{confirmation_token, load_rules_file, GateAction, GateEngine};
use crate::reports::{
    await_all, default_task_root, invalidate, read_report, ReportError, ReportStore,
    DEFAULT_POLL_INTERVAL,
};
use crate::shared::logging::append_handoff_log;
use std::path::PathBuf;
use std::time::Duration;

pub fn help_text() -> String {
    [
        "usage: taskgate <command> [args]",
        "",
        "  remove-report <path>...                        clear report files before relaunching a worker",
        "  wait-for-report [--interval <seconds>] <path>...",
        "                                                 clear the listed reports, then block until all exist",
        "  get-report <task_id> <report_kind>             print a report's raw content",
        "  check-command [--project-root <path>] [--rules <file>] <command>...",
        "                                                 classify a shell command before execution",
    ]
    .join("\n")
}

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match args[0].as_str() {
        "remove-report" => cmd_remove_report(&args[1..]),
        "wait-for-report" => cmd_wait_for_report(&args[1..]),
        "get-report" => cmd_get_report(&args[1..]),
        "check-command" => cmd_check_command(&args[1..]),
        "help" | "--help" => Ok(help_text()),
        other => Err(format!("unknown command `{other}`")),
    }
}

fn log_event(level: &str, event: &str, message: &str) {
    if let Ok(root) = default_task_root() {
        let store = ReportStore::new(root);
        append_handoff_log(&store.paths().log_path(), level, event, message);
    }
}

fn cmd_remove_report(args: &[String]) -> Result<String, String> {
    if args.is_empty() {
        return Err("usage: remove-report <path>...".to_string());
    }
    let paths: Vec<PathBuf> = args.iter().map(PathBuf::from).collect();
    let removed = invalidate(&paths).map_err(|e| e.to_string())?;
    log_event(
        "info",
        "report.invalidate",
        &format!("requested={} removed={}", paths.len(), removed.len()),
    );
    let mut lines = Vec::new();
    for path in &paths {
        let state = if removed.contains(path) {
            "removed"
        } else {
            "absent"
        };
        lines.push(format!("{state}={}", path.display()));
    }
    Ok(lines.join("\n"))
}

fn cmd_wait_for_report(args: &[String]) -> Result<String, String> {
    const USAGE: &str = "usage: wait-for-report [--interval <seconds>] <path>...";

    let mut interval = DEFAULT_POLL_INTERVAL;
    let mut rest = args;
    if rest.first().map(String::as_str) == Some("--interval") {
        let raw = rest.get(1).ok_or_else(|| USAGE.to_string())?;
        let seconds: u64 = raw
            .parse()
            .map_err(|_| format!("invalid interval `{raw}`; expected seconds"))?;
        if seconds == 0 {
            return Err("interval must be >= 1 second".to_string());
        }
        interval = Duration::from_secs(seconds);
        rest = &rest[2..];
    }
    if rest.is_empty() {
        return Err(USAGE.to_string());
    }

    let paths: Vec<PathBuf> = rest.iter().map(PathBuf::from).collect();
    // Freshness reset: a fast worker finishing before the wait starts must
    // never be confused with a leftover report from an earlier run.
    invalidate(&paths).map_err(|e| e.to_string())?;
    log_event(
        "info",
        "report.wait.started",
        &format!("paths={} interval_secs={}", paths.len(), interval.as_secs()),
    );
    await_all(&paths, interval).map_err(|e| e.to_string())?;
    log_event("info", "report.wait.ready", &format!("paths={}", paths.len()));

    Ok(paths
        .iter()
        .map(|path| format!("ready={}", path.display()))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn structured_failure(reason: &str, detail: &str) -> String {
    serde_json::json!({
        "status": "error",
        "reason": reason,
        "detail": detail,
    })
    .to_string()
}

fn cmd_get_report(args: &[String]) -> Result<String, String> {
    if args.len() != 2 {
        return Err(structured_failure(
            "usage",
            "usage: get-report <task_id> <report_kind>",
        ));
    }
    let root = default_task_root()
        .map_err(|e| structured_failure("io", &e.to_string()))?;
    let store = ReportStore::new(root);
    match read_report(&store, &args[0], &args[1]) {
        Ok(content) => Ok(content),
        Err(err @ ReportError::InvalidKind { .. }) => {
            Err(structured_failure("invalid_kind", &err.to_string()))
        }
        Err(err @ ReportError::NotFound { .. }) => {
            Err(structured_failure("not_found", &err.to_string()))
        }
        Err(err @ ReportError::EmptyReport { .. }) => {
            Err(structured_failure("empty_report", &err.to_string()))
        }
        Err(err) => Err(structured_failure("io", &err.to_string())),
    }
}

fn cmd_check_command(args: &[String]) -> Result<String, String> {
    const USAGE: &str =
        "usage: check-command [--project-root <path>] [--rules <file>] <command>...";

    let mut project_root: Option<PathBuf> = None;
    let mut rules_file: Option<PathBuf> = None;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--project-root" => {
                let value = args.get(i + 1).ok_or_else(|| USAGE.to_string())?;
                project_root = Some(PathBuf::from(value));
                i += 2;
            }
            "--rules" => {
                let value = args.get(i + 1).ok_or_else(|| USAGE.to_string())?;
                rules_file = Some(PathBuf::from(value));
                i += 2;
            }
            _ => break,
        }
    }
    if i >= args.len() {
        return Err(USAGE.to_string());
    }
    let command = args[i..].join(" ");

    let project_root = match project_root {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| format!("failed to resolve cwd: {e}"))?,
    };
    let engine = match rules_file {
        Some(path) => {
            let extra = load_rules_file(&path).map_err(|e| e.to_string())?;
            GateEngine::with_extra_rules(extra)
        }
        None => GateEngine::with_default_rules(),
    };

    let verdict = engine.classify(&command, &project_root);
    log_event(
        "info",
        "gate.verdict",
        &format!(
            "action={} rule={}",
            verdict.action,
            verdict.rule_id.as_deref().unwrap_or("none")
        ),
    );

    let mut lines = vec![
        format!("verdict={}", verdict.action),
        format!("rule={}", verdict.rule_id.as_deref().unwrap_or("none")),
        format!("rationale={}", verdict.rationale),
    ];
    if let Some(alternative) = &verdict.alternative {
        lines.push(format!("alternative={alternative}"));
    }
    match verdict.action {
        GateAction::Block => Err(lines.join("\n")),
        GateAction::Warn => {
            lines.push(format!("confirm_with={}", confirmation_token(&command)));
            Ok(lines.join("\n"))
        }
        GateAction::Allow => Ok(lines.join("\n")),
    }
}
