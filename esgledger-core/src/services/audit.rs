// src/services/audit.rs
//! Operation logbook: one JSON object per line under the configured path.
//! Best effort by design; a failed log write must never fail the operation
//! that produced it.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Record a generic action event (lightweight telemetry).
///
/// # Arguments
/// * `logbook` — Destination JSONL file.
/// * `agent` — Logical component name (e.g., `"portal"`, `"admin"`).
/// * `action` — Short verb label (e.g., `"record_created"`).
/// * `details` — Arbitrary JSON payload (parameters, ids, etc.).
/// * `severity` — `"low" | "medium" | "high"` — for quick triage.
pub fn record_action(logbook: &Path, agent: &str, action: &str, details: &Value, severity: &str) {
    let entry = json!({
        "id": Uuid::new_v4().to_string(),
        "timestamp": Utc::now().to_rfc3339(),
        "event": "action",
        "agent": agent,
        "action": action,
        "severity": severity,
        "details": details,
    });
    append_jsonl(logbook, &entry);
}

/// Append a single JSON value as a line. Creates parent directories if
/// missing; ignores write errors to avoid crashing the caller.
fn append_jsonl<S: Serialize>(path: &Path, val: &S) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(line) = serde_json::to_string(val) else {
        return;
    };
    if let Ok(mut f) = fs::OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(f, "{line}");
    }
}
