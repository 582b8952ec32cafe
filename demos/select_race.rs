//! Two producers race; the first to answer wins
//!
//! Losing workers are not cancelled. Their results stay readable until the
//! dispatch is dropped.

use fanrace::prelude::*;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn producer(name: &'static str, delay_ms: u64) -> Task<String> {
    Task::named(name, move || {
        thread::sleep(Duration::from_millis(delay_ms));
        format!("from {}", name)
    })
}

fn main() -> fanrace::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dispatcher = Dispatcher::with_defaults()?;

    println!("=== Select Demo ===\n");
    let mut dispatch = dispatcher.spawn(vec![producer("ch1", 300), producer("ch2", 600)])?;

    match dispatch.select(Some(Duration::from_secs(1)))? {
        DispatchOutcome::Resolved(completion) => {
            println!("winner {}: {:?}", completion.source, completion.outcome)
        }
        DispatchOutcome::TimedOut => println!("no producer answered"),
    }

    if let Some(late) = dispatch.recv(None) {
        println!("late    {}: {:?}", late.source, late.outcome);
    }

    println!("\n=== Select With Timeout Demo ===\n");
    let outcome = dispatcher.dispatch(
        vec![producer("ch1", 300), producer("ch2", 600)],
        Some(Duration::from_millis(100)),
    )?;
    println!("timed out: {}", outcome.is_timed_out());

    Ok(())
}
