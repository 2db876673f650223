use super::ReportError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Blocks until every listed path exists, polling at a fixed interval. No
/// backoff, no timeout: callers needing a bound use [`await_all_until`].
///
/// Returns only after all paths were observed present within a single poll
/// pass. Writes by separate workers may land at different times; the only
/// guarantee is that by the time this returns, one pass saw all of them.
pub fn await_all(paths: &[PathBuf], interval: Duration) -> Result<(), ReportError> {
    let stop = AtomicBool::new(false);
    await_all_until(paths, interval, None, &stop)
}

/// Full form of the poll-wait: an optional deadline bounds the total wait,
/// and flipping `stop` makes the call return early, so callers can compose
/// timeouts and cancellation instead of killing the process.
///
/// An empty path list is a caller error and fails fast rather than returning
/// immediately, to avoid masking misuse.
pub fn await_all_until(
    paths: &[PathBuf],
    interval: Duration,
    deadline: Option<Duration>,
    stop: &AtomicBool,
) -> Result<(), ReportError> {
    if paths.is_empty() {
        return Err(ReportError::EmptyWaitSet);
    }

    let started = Instant::now();
    loop {
        if paths.iter().all(|path| path.is_file()) {
            return Ok(());
        }
        if let Some(limit) = deadline {
            if started.elapsed() >= limit {
                return Err(ReportError::DeadlineExceeded {
                    deadline_ms: limit.as_millis(),
                });
            }
        }
        if !sleep_with_stop(stop, interval) {
            return Err(ReportError::WaitStopped);
        }
    }
}

fn sleep_with_stop(stop: &AtomicBool, total: Duration) -> bool {
    let mut remaining = total;
    while remaining > Duration::from_millis(0) {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let step = remaining.min(Duration::from_millis(200));
        thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
    !stop.load(Ordering::Relaxed)
}
