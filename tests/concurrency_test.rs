// tests/concurrency_test.rs — Integration test: shared Assistant across threads

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;

use foresight::history::{ActionEvent, ActionKey, ActionKind};
use foresight::infra::config::Config;
use foresight::suggest::{ContextSnapshot, DocRef};
use foresight::Assistant;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn shared(capacity: usize) -> Arc<Assistant> {
    let mut config = Config::default();
    config.history.capacity = capacity;
    Arc::new(Assistant::new(&config))
}

#[test]
fn test_concurrent_records_are_all_counted() {
    let a = shared(1000);
    let categories = ["Walls", "Doors", "Windows", "Floors"];

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let a = Arc::clone(&a);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let category = categories[(t + i) % categories.len()];
                    a.record(ActionEvent::new(ActionKind::Add, category));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("recorder thread");
    }

    let total = THREADS * PER_THREAD;
    let stats = a.statistics();
    assert_eq!(stats.total_recorded, total as u64);
    assert_eq!(stats.retained, 1000);
    assert_eq!(stats.total_transitions, total as u64 - 1);
    assert_eq!(stats.unique_keys, 4);

    let sum: u64 = a.action_frequencies(10).iter().map(|(_, c)| c).sum();
    assert_eq!(sum, total as u64);
}

#[test]
fn test_readers_and_writers_interleave() {
    let a = shared(200);
    let doc = DocRef::new("d1", "Tower");

    let writer = {
        let a = Arc::clone(&a);
        let doc = doc.clone();
        thread::spawn(move || {
            for i in 0..1000u32 {
                let event = if i % 2 == 0 {
                    ActionEvent::new(ActionKind::Add, "Walls").with_count(3)
                } else {
                    ActionEvent::new(ActionKind::Modify, "Walls")
                };
                a.process_event(&event, &doc);
                a.record(event);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let a = Arc::clone(&a);
            let doc = doc.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let preds = a.predict(&ActionKey::parse("Add|Walls"), 3);
                    assert!(preds.len() <= 3);
                    assert!(a.recent_actions(50).len() <= 50);
                    a.update_context(&ContextSnapshot::new(doc.clone()));
                    for s in a.suggestions(5) {
                        assert!(s.relevance > 0.0);
                    }
                }
            })
        })
        .collect();

    writer.join().expect("writer thread");
    for r in readers {
        r.join().expect("reader thread");
    }

    assert_eq!(a.statistics().total_recorded, 1000);
    assert_eq!(a.statistics().retained, 200);
    let preds = a.predict(&ActionKey::parse("Add|Walls"), 1);
    assert_eq!(preds[0].key.as_str(), "Modify|Walls");
}

#[test]
fn test_tasks_and_feedback_across_threads() {
    let a = shared(5000);
    a.start_task("Parallel");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let a = Arc::clone(&a);
            thread::spawn(move || {
                for _ in 0..25 {
                    a.record(ActionEvent::new(ActionKind::Add, "Columns"));
                    a.accept_suggestion("nothing pending");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("worker thread");
    }

    let session = a.end_task().expect("task open");
    assert_eq!(session.actions.len(), 100);
    assert!(a.export_snapshot().feedback.values().all(|c| *c == 0));
}
