//! Persistence layout: two independently-keyed records, one per tier.
//!
//! Each record is a JSON array of `{description, priority}` objects. The
//! decode side is deliberately forgiving — a missing or mangled record means
//! an empty tier, never a startup failure. Storage binding (files, kv, ...)
//! is the host's concern.

use anyhow::Result;

use crate::task::Task;

/// Record key for the active window.
pub const ACTIVE_RECORD: &str = "active-tasks";
/// Record key for the backlog.
pub const BACKLOG_RECORD: &str = "backlog-tasks";

pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Decode one record. Unparsable input yields an empty tier; priorities are
/// re-clamped so hand-edited records can't smuggle out-of-range values in.
pub fn decode_tasks(raw: &str) -> Vec<Task> {
    let tasks: Vec<Task> = serde_json::from_str(raw).unwrap_or_default();
    tasks
        .into_iter()
        .map(|t| Task::new(t.description, t.priority))
        .collect()
}
