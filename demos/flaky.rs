//! # Example: flaky
//!
//! Demonstrates how [`Retrier`] retries a flaky operation with linear backoff,
//! logging every decision through [`LogWriter`].
//!
//! The operation fails twice with an ordinary failure, once with a transient
//! one, then succeeds. A second run shows a fatal failure being returned as-is.
//!
//! ## Flow
//! ```text
//! retry_loop
//!   ├─► attempt 1 → Err("boom #1")      ─► Retrying{delay=100ms}
//!   ├─► attempt 2 → Err("boom #2")      ─► Retrying{delay=200ms}
//!   ├─► attempt 3 → Err(transient)      ─► Retrying{delay=300ms}
//!   └─► attempt 4 → Ok(4)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=retryvisor=debug cargo run --example flaky
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use retryvisor::{LinearBackoff, LogWriter, Retrier, RetryConfig, RetryError, WorkError, WorkFn};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,retryvisor=debug"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 1. Engine with default limits and the built-in logger.
    let retrier = Retrier::try_new(RetryConfig::default())?.with_subscriber(Arc::new(LogWriter));

    // 2. Work that fails three times before succeeding.
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let flaky = WorkFn::new(move || {
        let attempt = counter.fetch_add(1, Ordering::Relaxed) + 1;
        async move {
            println!("[flaky] attempt {attempt}");
            match attempt {
                1 | 2 => Err(WorkError::fail(format!("boom #{attempt}"))),
                3 => Err(WorkError::transient("connection reset")),
                _ => Ok(attempt),
            }
        }
    });

    // 3. Retry everything except fatal failures, with linear backoff.
    //    Transient failures are retried whatever the predicate says.
    let plan = retrier
        .plan_if(|e: &WorkError| !matches!(e, WorkError::Fatal { .. }))
        .backoff(LinearBackoff {
            increment: Duration::from_millis(100),
            max_count: 5,
        })
        .named("flaky");

    let cancel = CancellationToken::new();
    let value = retrier.execute(flaky, plan, &cancel).await?;
    println!("[flaky] succeeded with {value} after {} call(s)", calls.load(Ordering::Relaxed));

    // 4. A fatal failure is handed back unmodified on the first attempt.
    let broken = WorkFn::new(|| async { Err::<(), _>(WorkError::fatal("schema mismatch")) });
    let plan = retrier
        .plan_if(|e: &WorkError| !matches!(e, WorkError::Fatal { .. }))
        .named("broken");
    match retrier.execute(broken, plan, &cancel).await {
        Err(RetryError::Failed { attempts, error }) => {
            println!("[broken] gave up after {attempts} attempt(s): {error}");
        }
        other => println!("[broken] unexpected outcome: {other:?}"),
    }

    Ok(())
}
