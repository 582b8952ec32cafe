//! Recovering from a panic, on the current thread and inside workers

use fanrace::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn divide(a: i32, b: i32) -> i32 {
    if b == 0 {
        panic!("division by zero");
    }
    a / b
}

fn main() -> fanrace::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== Local Recover Demo ===\n");
    match recover(|| divide(10, 0)) {
        Ok(result) => println!("Result: {}", result),
        Err(failure) => println!("Recovered from panic: {}", failure.message()),
    }

    println!("\n=== Worker Isolation Demo ===\n");
    let dispatcher = Dispatcher::with_defaults()?;

    let completions = dispatcher
        .spawn(vec![
            Task::named("10/0", || divide(10, 0)),
            Task::named("10/2", || divide(10, 2)),
            Task::named("9/3", || divide(9, 3)),
        ])?
        .join_all();

    for completion in completions {
        match completion.outcome {
            Ok(value) => println!("{} = {}", completion.source, value),
            Err(failure) => println!("{} failed: {}", completion.source, failure),
        }
    }

    let outcome = dispatcher.dispatch(
        vec![Task::named("only-faulty", || divide(1, 0))],
        Some(Duration::from_secs(1)),
    )?;
    println!("\nfailure marker resolves the race: {:?}", outcome.completion().map(|c| c.outcome));

    println!("\nPanics contained: {}", dispatcher.panic_count());
    Ok(())
}
