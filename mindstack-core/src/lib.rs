//! mindstack-core: the MindStack task prioritization engine.

pub mod intent;
pub mod queue;
pub mod store;
pub mod task;

pub use intent::{Operation, ResolvedIntent, TaskParams};
pub use queue::{DEFAULT_CAPACITY, StateObserver, TaskQueue};
pub use store::{ACTIVE_RECORD, BACKLOG_RECORD, decode_tasks, encode_tasks};
pub use task::{PRIORITY_MAX, PRIORITY_MIN, Task, clamp_priority};
