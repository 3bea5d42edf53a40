//! TaskQueue — the two-tier prioritization engine.
//!
//! Design:
//! - `active` is the visible working window: at most `capacity` tasks,
//!   sorted by priority descending, newest-first among equals.
//! - `backlog` is unbounded holding space with the same ordering.
//! - Pushing past capacity evicts the tail of `active` (lowest priority,
//!   oldest among equals) into the backlog — exactly one eviction per push.
//! - Popping the active head promotes the backlog head into the vacated
//!   slot, so the window is never emptier than the backlog allows.
//!
//! The engine is pure state transitions: no I/O, no async, no internal
//! failure modes. Persistence and notifications hang off the
//! [`StateObserver`] hook, which fires once per mutating operation.

use crate::task::Task;

/// Size of the visible window when the host names none.
pub const DEFAULT_CAPACITY: usize = 3;

/// Called after every mutating operation with the full post-state.
///
/// Implementations own their failure handling; the engine never sees an
/// observer error.
pub trait StateObserver {
    fn state_changed(&mut self, active: &[Task], backlog: &[Task]);
}

pub struct TaskQueue {
    active: Vec<Task>,
    backlog: Vec<Task>,
    capacity: usize,
    observer: Option<Box<dyn StateObserver>>,
}

impl TaskQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            active: Vec::new(),
            backlog: Vec::new(),
            capacity: capacity.max(1),
            observer: None,
        }
    }

    /// Restore a persisted snapshot.
    ///
    /// Stored state may be stale or hand-edited: priorities are re-clamped,
    /// both tiers are stably re-sorted, and any active overflow (e.g. the
    /// configured capacity shrank since the state was written) drains
    /// tail-first into the backlog.
    pub fn with_state(capacity: usize, active: Vec<Task>, backlog: Vec<Task>) -> Self {
        let mut q = Self::new(capacity);
        q.active = active
            .into_iter()
            .filter_map(|t| Task::validated(&t.description, t.priority))
            .collect();
        q.backlog = backlog
            .into_iter()
            .filter_map(|t| Task::validated(&t.description, t.priority))
            .collect();

        sort_descending(&mut q.active);
        sort_descending(&mut q.backlog);
        while q.active.len() > q.capacity {
            if let Some(evicted) = q.active.pop() {
                insert_sorted(&mut q.backlog, evicted);
            }
        }
        q
    }

    /// Attach the persistence/notification hook. The previous observer, if
    /// any, is dropped.
    pub fn set_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observer = Some(observer);
    }

    /// Push a task onto the active window.
    ///
    /// The new task wins ties against existing equal-priority entries. If
    /// the window then exceeds capacity, the sorted tail moves to the
    /// backlog — which may be the task just pushed, when its priority sorts
    /// last.
    pub fn push_active(&mut self, description: &str, priority: i32) {
        let Some(task) = Task::validated(description, priority) else {
            return;
        };
        insert_sorted(&mut self.active, task);
        if self.active.len() > self.capacity {
            if let Some(evicted) = self.active.pop() {
                insert_sorted(&mut self.backlog, evicted);
            }
        }
        self.notify();
    }

    /// Remove the highest-priority active task, then refill the vacated
    /// slot from the backlog head (keeping its original priority).
    ///
    /// No-op on an empty window.
    pub fn pop_active(&mut self) {
        if self.active.is_empty() {
            return;
        }
        self.active.remove(0);
        if !self.backlog.is_empty() {
            let promoted = self.backlog.remove(0);
            insert_sorted(&mut self.active, promoted);
        }
        self.notify();
    }

    /// Push a task onto the backlog. Never touches the active window.
    pub fn push_backlog(&mut self, description: &str, priority: i32) {
        let Some(task) = Task::validated(description, priority) else {
            return;
        };
        insert_sorted(&mut self.backlog, task);
        self.notify();
    }

    /// Remove and return the highest-priority backlog task.
    ///
    /// Invoked directly this simply drops the entry; promotion into the
    /// active window only happens inside [`Self::pop_active`].
    pub fn pop_backlog(&mut self) -> Option<Task> {
        if self.backlog.is_empty() {
            return None;
        }
        let task = self.backlog.remove(0);
        self.notify();
        Some(task)
    }

    /// Empty the active window. The backlog is untouched.
    pub fn clear_active(&mut self) {
        self.active.clear();
        self.notify();
    }

    /// Empty the backlog. The active window is untouched.
    pub fn clear_backlog(&mut self) {
        self.backlog.clear();
        self.notify();
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    /// The active window capped for display.
    pub fn active_window(&self, limit: usize) -> &[Task] {
        &self.active[..limit.min(self.active.len())]
    }

    pub fn backlog(&self) -> &[Task] {
        &self.backlog
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_len(&self) -> usize {
        self.active.len() + self.backlog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.backlog.is_empty()
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.state_changed(&self.active, &self.backlog);
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Head insert + stable descending sort: the newcomer ends up ahead of
/// existing entries with equal priority.
fn insert_sorted(tier: &mut Vec<Task>, task: Task) {
    tier.insert(0, task);
    sort_descending(tier);
}

fn sort_descending(tier: &mut [Task]) {
    tier.sort_by(|a, b| b.priority.cmp(&a.priority));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions(tier: &[Task]) -> Vec<&str> {
        tier.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn push_keeps_window_sorted_descending() {
        let mut q = TaskQueue::new(3);
        q.push_active("A", 1);
        q.push_active("B", 2);
        q.push_active("C", 33); // clamped to 10

        assert_eq!(descriptions(q.active()), vec!["C", "B", "A"]);
        assert_eq!(q.active()[0].priority, 10);
        assert!(q.backlog().is_empty());
    }

    #[test]
    fn overflow_evicts_lowest_priority_into_backlog() {
        let mut q = TaskQueue::new(3);
        q.push_active("A", 1);
        q.push_active("B", 2);
        q.push_active("C", 33);
        q.push_active("D", 4);

        assert_eq!(descriptions(q.active()), vec!["C", "D", "B"]);
        assert_eq!(descriptions(q.backlog()), vec!["A"]);
    }

    #[test]
    fn pop_active_promotes_backlog_head() {
        let mut q = TaskQueue::new(3);
        q.push_active("A", 1);
        q.push_active("B", 2);
        q.push_active("C", 33);
        q.push_active("D", 4);
        q.pop_active();

        assert_eq!(descriptions(q.active()), vec!["D", "B", "A"]);
        assert!(q.backlog().is_empty());
        assert_eq!(q.active()[2].priority, 1); // original priority survives
    }

    #[test]
    fn equal_priority_newest_wins() {
        let mut q = TaskQueue::new(3);
        q.push_active("X", 5);
        q.push_active("Y", 5);

        assert_eq!(descriptions(q.active()), vec!["Y", "X"]);
    }

    #[test]
    fn overflow_tie_evicts_oldest() {
        let mut q = TaskQueue::new(2);
        q.push_active("old", 1);
        q.push_active("mid", 1);
        q.push_active("new", 1);

        // newest-first among equals, so the original entry sorts last
        assert_eq!(descriptions(q.active()), vec!["new", "mid"]);
        assert_eq!(descriptions(q.backlog()), vec!["old"]);
    }

    #[test]
    fn push_low_priority_bounces_to_backlog() {
        let mut q = TaskQueue::new(2);
        q.push_active("A", 9);
        q.push_active("B", 8);
        q.push_active("C", 0);

        // Insert-then-evict: the newcomer itself sorts last and moves out.
        assert_eq!(descriptions(q.active()), vec!["A", "B"]);
        assert_eq!(descriptions(q.backlog()), vec!["C"]);
    }

    #[test]
    fn pops_on_empty_tiers_are_noops() {
        let mut q = TaskQueue::new(3);
        q.pop_active();
        assert!(q.pop_backlog().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn pop_backlog_drops_without_promotion() {
        let mut q = TaskQueue::new(3);
        q.push_backlog("a", 2);
        q.push_backlog("b", 7);

        let popped = q.pop_backlog().unwrap();
        assert_eq!(popped.description, "b");
        assert!(q.active().is_empty());
        assert_eq!(descriptions(q.backlog()), vec!["a"]);
    }

    #[test]
    fn clears_touch_only_their_tier() {
        let mut q = TaskQueue::new(2);
        q.push_active("a", 3);
        q.push_backlog("b", 3);

        q.clear_active();
        assert!(q.active().is_empty());
        assert_eq!(q.backlog().len(), 1);

        q.clear_backlog();
        q.clear_backlog(); // idempotent
        assert!(q.is_empty());
    }

    #[test]
    fn blank_descriptions_are_ignored() {
        let mut q = TaskQueue::new(3);
        q.push_active("  ", 5);
        q.push_backlog("", 5);
        assert!(q.is_empty());
    }

    #[test]
    fn capacity_holds_under_mixed_operations() {
        let mut q = TaskQueue::new(3);
        for i in 0..20 {
            q.push_active(&format!("t{i}"), i % 11);
            assert!(q.active().len() <= 3);
        }
        assert_eq!(q.total_len(), 20);

        for _ in 0..5 {
            q.pop_active();
            assert!(q.active().len() <= 3);
        }
        assert_eq!(q.total_len(), 15);
    }

    #[test]
    fn hydration_restores_order_and_drains_overflow() {
        let active = vec![
            Task::new("low", 1),
            Task::new("high", 9),
            Task::new("mid", 5),
            Task::new("extra", 3),
        ];
        let backlog = vec![Task::new("bg", 4)];

        let q = TaskQueue::with_state(3, active, backlog);
        assert_eq!(descriptions(q.active()), vec!["high", "mid", "extra"]);
        // "low" drained tail-first and outranks nothing above 4
        assert_eq!(descriptions(q.backlog()), vec!["bg", "low"]);
    }

    #[test]
    fn observer_sees_every_mutation() {
        struct Counter(std::rc::Rc<std::cell::Cell<usize>>);
        impl StateObserver for Counter {
            fn state_changed(&mut self, _active: &[Task], _backlog: &[Task]) {
                self.0.set(self.0.get() + 1);
            }
        }

        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut q = TaskQueue::new(3);
        q.set_observer(Box::new(Counter(count.clone())));

        q.push_active("a", 1);
        q.push_backlog("b", 1);
        q.pop_active(); // promotion is internal: still one notification
        q.clear_active();
        assert_eq!(count.get(), 4);
    }
}
