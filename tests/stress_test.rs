//! Stress tests for the dispatcher

use fanrace::prelude::*;
use std::time::Duration;

#[test]
#[ignore] // Run with --ignored flag
fn stress_test_many_dispatches() {
    let dispatcher = Dispatcher::new(
        Config::builder()
            .panic_strategy(PanicStrategy::Isolate)
            .stack_size(64 * 1024)
            .build()
            .unwrap(),
    )
    .unwrap();

    for round in 0..200 {
        let tasks: Vec<Task<usize>> = (0..16).map(|i| Task::new(move || i)).collect();
        let outcome = dispatcher
            .dispatch(tasks, Some(Duration::from_secs(5)))
            .unwrap();
        assert!(!outcome.is_timed_out(), "round {}", round);
    }
}

#[test]
#[ignore]
fn stress_test_max_width_dispatch() {
    let dispatcher = Dispatcher::new(
        Config::builder()
            .panic_strategy(PanicStrategy::Isolate)
            .stack_size(64 * 1024)
            .max_tasks(1000)
            .build()
            .unwrap(),
    )
    .unwrap();

    let tasks: Vec<Task<usize>> = (0..1000)
        .map(|i| {
            Task::new(move || {
                if i % 3 == 0 {
                    panic!("task {}", i);
                }
                i
            })
        })
        .collect();

    let completions = dispatcher.spawn(tasks).unwrap().join_all();
    assert_eq!(completions.len(), 1000);
    assert_eq!(completions.iter().filter(|c| !c.is_ok()).count(), 334);
    assert_eq!(dispatcher.panic_count(), 334);
}

#[test]
#[ignore]
fn stress_test_abandoned_dispatches() {
    let dispatcher = Dispatcher::new(
        Config::builder()
            .panic_strategy(PanicStrategy::Isolate)
            .build()
            .unwrap(),
    )
    .unwrap();

    // losers write into channels nobody reads any more
    for _ in 0..50 {
        let outcome = dispatcher
            .dispatch(
                vec![
                    Task::new(|| 0u64),
                    Task::new(|| {
                        std::thread::sleep(Duration::from_millis(20));
                        1u64
                    }),
                ],
                Some(Duration::from_secs(5)),
            )
            .unwrap();
        assert!(outcome.completion().is_some());
    }

    std::thread::sleep(Duration::from_millis(100));
}
