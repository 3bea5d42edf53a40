//! Resolved voice intents and their dispatch onto the engine.
//!
//! The intent resolver (an external classifier) turns one transcript into at
//! most one of the six recognized operations. This module owns the wire
//! shape of that result and the single place where a resolved intent becomes
//! an engine call.

use serde::{Deserialize, Serialize};

use crate::queue::TaskQueue;
use crate::task::clamp_priority;

/// The six operations a transcript can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    PushActive,
    PopActive,
    ClearActive,
    PushBacklog,
    PopBacklog,
    ClearBacklog,
}

/// Parameters for the push variants. Absent priority means 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskParams {
    pub description: String,
    #[serde(default)]
    pub priority: i32,
}

/// One resolver verdict per transcript.
///
/// `operation: None` means nothing was recognized, and the acknowledgement
/// explains the failure instead of describing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIntent {
    pub operation: Option<Operation>,
    #[serde(default)]
    pub parameters: Option<TaskParams>,
    pub acknowledgement: String,
}

impl ResolvedIntent {
    /// A "didn't understand" verdict with the given explanation.
    pub fn unrecognized(acknowledgement: impl Into<String>) -> Self {
        Self {
            operation: None,
            parameters: None,
            acknowledgement: acknowledgement.into(),
        }
    }

    /// Re-apply boundary validation: clamp the parameter priority, and
    /// demote a push without a usable description to unrecognized.
    pub fn sanitized(mut self) -> Self {
        if let Some(p) = self.parameters.as_mut() {
            p.priority = clamp_priority(p.priority);
        }
        if matches!(
            self.operation,
            Some(Operation::PushActive) | Some(Operation::PushBacklog)
        ) {
            let usable = self
                .parameters
                .as_ref()
                .is_some_and(|p| !p.description.trim().is_empty());
            if !usable {
                return Self::unrecognized("I heard a push but no task to push.");
            }
        }
        self
    }

    /// Execute at most one engine operation. Returns whether anything ran.
    pub fn apply(&self, queue: &mut TaskQueue) -> bool {
        let Some(operation) = self.operation else {
            return false;
        };
        match operation {
            Operation::PushActive => match self.parameters.as_ref() {
                Some(p) => {
                    queue.push_active(&p.description, p.priority);
                    true
                }
                None => false,
            },
            Operation::PushBacklog => match self.parameters.as_ref() {
                Some(p) => {
                    queue.push_backlog(&p.description, p.priority);
                    true
                }
                None => false,
            },
            Operation::PopActive => {
                queue.pop_active();
                true
            }
            Operation::PopBacklog => {
                queue.pop_backlog();
                true
            }
            Operation::ClearActive => {
                queue.clear_active();
                true
            }
            Operation::ClearBacklog => {
                queue.clear_backlog();
                true
            }
        }
    }
}
