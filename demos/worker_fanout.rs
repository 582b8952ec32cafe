//! Three workers started in the background, then collected
//!
//! Run with `RUST_LOG=fanrace=trace` to watch workers start and report.

use fanrace::prelude::*;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn worker(id: usize) -> usize {
    println!("  Worker {} started", id);
    thread::sleep(Duration::from_millis(500));
    println!("  Worker {} finished", id);
    id
}

fn main() -> fanrace::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Worker Fan-out Demo ===\n");

    let dispatcher = Dispatcher::with_defaults()?;

    let tasks: Vec<Task<usize>> = (1..=3)
        .map(|id| Task::named(format!("worker-{}", id), move || worker(id)))
        .collect();

    let dispatch = dispatcher.spawn(tasks)?;
    println!("Spawned {} workers, waiting for all of them\n", dispatch.len());

    for completion in dispatch.join_all() {
        println!(
            "{} -> {:?} in {:?}",
            completion.source, completion.outcome, completion.elapsed
        );
    }

    println!("\n✓ All workers reported");
    Ok(())
}
