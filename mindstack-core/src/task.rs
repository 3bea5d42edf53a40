//! Task model for the MindStack prioritization engine.
//!
//! A task is nothing more than what the user said plus how urgent they said
//! it was. There is no id: two tasks with the same description and priority
//! are distinct entries and may coexist on either tier.

use serde::{Deserialize, Serialize};

/// Lowest accepted priority (the default when the user names none).
pub const PRIORITY_MIN: i32 = 0;
/// Highest accepted priority.
pub const PRIORITY_MAX: i32 = 10;

/// Bound a priority into the accepted range.
pub fn clamp_priority(priority: i32) -> i32 {
    priority.clamp(PRIORITY_MIN, PRIORITY_MAX)
}

/// Core task type.
///
/// Kept small + serializable; the persisted records are plain JSON arrays of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,

    /// 0-10, higher means more urgent.
    pub priority: i32,
}

impl Task {
    pub fn new(description: impl Into<String>, priority: i32) -> Self {
        Self {
            description: description.into(),
            priority: clamp_priority(priority),
        }
    }

    /// Construct from raw user input. Returns `None` for a blank
    /// description; clamps the priority.
    pub fn validated(description: &str, priority: i32) -> Option<Self> {
        let description = description.trim();
        if description.is_empty() {
            return None;
        }
        Some(Self::new(description, priority))
    }
}
