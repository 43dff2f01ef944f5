//! Observability: tracing init and the bootstrap event log.
//!
//! Uses config::ObservabilityConfig for PYBOOT_QUIET, LOG_LEVEL, EVENT_LOG, etc.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

static EVENT_PATH: Mutex<Option<String>> = Mutex::new(None);

/// Initialize tracing. Call at process startup.
/// When PYBOOT_QUIET=1, only WARN and above are logged.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level: String = if cfg.quiet {
        "pyboot=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn get_event_path() -> Option<String> {
    {
        let guard = EVENT_PATH.lock().ok()?;
        if let Some(ref p) = *guard {
            return Some(p.clone());
        }
    }
    let path = crate::config::ObservabilityConfig::from_env().event_log.clone()?;
    if path.is_empty() {
        return None;
    }
    // Ensure parent dir exists
    if let Some(parent) = Path::new(&path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    {
        let mut guard = EVENT_PATH.lock().ok()?;
        *guard = Some(path.clone());
    }
    tracing::debug!("Event log: {}", path);
    Some(path)
}

fn append_jsonl(path: &str, record: &serde_json::Value) {
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
        if let Ok(line) = serde_json::to_string(record) {
            let _ = writeln!(f, "{}", line);
        }
    }
}

/// Event: step_started (right before spawn)
pub fn event_step_started(step: &str, cmd: &str, args: &[&str], cwd: &str) {
    if let Some(path) = get_event_path() {
        let record = json!({
            "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "event": "step_started",
            "step": step,
            "cmd": cmd,
            "args": args,
            "cwd": cwd
        });
        append_jsonl(&path, &record);
    }
}

/// Event: step_completed (after the child exits, success or not)
pub fn event_step_completed(step: &str, exit_code: i32, duration_ms: u64) {
    if let Some(path) = get_event_path() {
        let record = json!({
            "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "event": "step_completed",
            "step": step,
            "exit_code": exit_code,
            "duration_ms": duration_ms,
            "success": exit_code == 0
        });
        append_jsonl(&path, &record);
    }
}

/// Event: creation_skipped — the environment directory already existed
pub fn event_creation_skipped(env_dir: &str) {
    if let Some(path) = get_event_path() {
        let record = json!({
            "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "event": "creation_skipped",
            "env_dir": env_dir
        });
        append_jsonl(&path, &record);
    }
}
