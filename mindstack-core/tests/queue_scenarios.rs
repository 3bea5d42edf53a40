//! End-to-end walks through the engine under realistic command sequences,
//! including a full persistence round trip through the record codec.

use mindstack_core::{
    Operation, ResolvedIntent, Task, TaskParams, TaskQueue, decode_tasks, encode_tasks,
};

fn descriptions(tier: &[Task]) -> Vec<&str> {
    tier.iter().map(|t| t.description.as_str()).collect()
}

fn push_intent(operation: Operation, description: &str, priority: i32) -> ResolvedIntent {
    ResolvedIntent {
        operation: Some(operation),
        parameters: Some(TaskParams {
            description: description.into(),
            priority,
        }),
        acknowledgement: "done".into(),
    }
}

fn bare_intent(operation: Operation) -> ResolvedIntent {
    ResolvedIntent {
        operation: Some(operation),
        parameters: None,
        acknowledgement: "done".into(),
    }
}

/// The canonical capacity-3 session: fill the window, overflow, finish the
/// top task, then try to drain an already-empty backlog.
#[test]
fn full_session_walkthrough() {
    let mut q = TaskQueue::new(3);

    q.push_active("A", 1);
    q.push_active("B", 2);
    q.push_active("C", 33); // resolver would clamp; engine clamps anyway
    assert_eq!(descriptions(q.active()), vec!["C", "B", "A"]);
    assert!(q.backlog().is_empty());

    q.push_active("D", 4);
    assert_eq!(descriptions(q.active()), vec!["C", "D", "B"]);
    assert_eq!(descriptions(q.backlog()), vec!["A"]);

    q.pop_active();
    assert_eq!(descriptions(q.active()), vec!["D", "B", "A"]);
    assert!(q.backlog().is_empty());

    q.clear_backlog();
    assert!(q.pop_backlog().is_none());
    assert_eq!(descriptions(q.active()), vec!["D", "B", "A"]);
}

/// Every push adds exactly one task overall; eviction moves, never drops.
#[test]
fn pushes_conserve_total_count() {
    let mut q = TaskQueue::new(3);
    for i in 0..50 {
        q.push_active(&format!("task {i}"), (i * 7) % 11);
        assert_eq!(q.total_len(), i as usize + 1);
        assert!(q.active().len() <= q.capacity());
    }
    for popped in 0..50usize {
        q.pop_active();
        assert_eq!(q.total_len(), 49 - popped);
    }
    assert!(q.is_empty());
}

/// Popping a full window with backlog present keeps the window full and
/// strictly shrinks the backlog.
#[test]
fn promotion_keeps_window_full() {
    let mut q = TaskQueue::new(3);
    for i in 0..8 {
        q.push_active(&format!("t{i}"), i);
    }
    assert_eq!(q.active().len(), 3);
    assert_eq!(q.backlog().len(), 5);

    for remaining in (0..5usize).rev() {
        q.pop_active();
        assert_eq!(q.active().len(), 3);
        assert_eq!(q.backlog().len(), remaining);
    }
}

/// Ordering invariants hold across a mixed command stream, including the
/// newest-first tie-break.
#[test]
fn tiers_stay_sorted_with_newest_first_ties() {
    let mut q = TaskQueue::new(3);
    let script = [
        ("email inbox", 5),
        ("standup notes", 5),
        ("deploy fix", 9),
        ("water plants", 0),
        ("review pr", 5),
        ("book flights", 9),
    ];
    for (description, priority) in script {
        q.push_active(description, priority);
        for tier in [q.active(), q.backlog()] {
            for pair in tier.windows(2) {
                assert!(pair[0].priority >= pair[1].priority);
            }
        }
    }

    // Among the three priority-5 entries, later pushes outrank earlier ones
    // wherever they landed.
    let order: Vec<&str> = q
        .active()
        .iter()
        .chain(q.backlog().iter())
        .filter(|t| t.priority == 5)
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(order, vec!["review pr", "standup notes", "email inbox"]);
}

/// Serialize both tiers through the record codec and hydrate a new engine:
/// identical ordered state.
#[test]
fn persistence_round_trip_preserves_state() {
    let mut q = TaskQueue::new(3);
    for i in 0..7 {
        q.push_active(&format!("job {i}"), (11 - i) % 11);
    }

    let active_record = encode_tasks(q.active()).unwrap();
    let backlog_record = encode_tasks(q.backlog()).unwrap();

    let restored = TaskQueue::with_state(
        3,
        decode_tasks(&active_record),
        decode_tasks(&backlog_record),
    );
    assert_eq!(restored.active(), q.active());
    assert_eq!(restored.backlog(), q.backlog());
}

/// A command stream expressed as resolved intents, the way the voice
/// pipeline drives the engine.
#[test]
fn resolved_intents_drive_the_engine() {
    let mut q = TaskQueue::new(3);

    assert!(push_intent(Operation::PushActive, "ship release", 8).apply(&mut q));
    assert!(push_intent(Operation::PushActive, "lunch", 1).apply(&mut q));
    assert!(push_intent(Operation::PushBacklog, "read paper", 3).apply(&mut q));
    assert!(bare_intent(Operation::PopActive).apply(&mut q));

    // "ship release" done; "read paper" promoted next to "lunch".
    assert_eq!(descriptions(q.active()), vec!["read paper", "lunch"]);
    assert!(q.backlog().is_empty());

    assert!(!ResolvedIntent::unrecognized("static noise").apply(&mut q));
    assert!(bare_intent(Operation::ClearActive).apply(&mut q));
    assert!(q.is_empty());
}
