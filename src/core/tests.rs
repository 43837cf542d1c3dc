use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    BackoffKind, BlockingFn, Event, EventKind, FixedBackoff, LinearBackoff, Retrier, RetryConfig,
    RetryError, RetryPlan, Subscribe, WorkError, WorkFn,
};

/// Records every event it receives.
#[derive(Default)]
struct Recorder(Mutex<Vec<Event>>);

impl Recorder {
    fn kinds(&self) -> Vec<EventKind> {
        self.0.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    fn attempts(&self) -> Vec<Option<u32>> {
        self.0.lock().unwrap().iter().map(|e| e.attempt).collect()
    }
}

impl Subscribe for Recorder {
    fn on_event(&self, event: &Event) {
        self.0.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

fn config(max_attempts: u32, delay: Duration) -> RetryConfig {
    RetryConfig {
        max_attempts,
        default_backoff: BackoffKind::Fixed,
        fixed: FixedBackoff { delay },
        ..RetryConfig::default()
    }
}

/// Work failing with `failures[i]` on attempt `i + 1`, then succeeding with the attempt number.
fn scripted(
    calls: Arc<AtomicU32>,
    failures: Vec<WorkError>,
) -> WorkFn<impl FnMut() -> std::future::Ready<Result<u32, WorkError>> + Send> {
    WorkFn::new(move || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        let result = match failures.get(n as usize - 1) {
            Some(err) => Err(err.clone()),
            None => Ok(n),
        };
        std::future::ready(result)
    })
}

/// Work that always fails with `err`.
fn always(
    calls: Arc<AtomicU32>,
    err: WorkError,
) -> WorkFn<impl FnMut() -> std::future::Ready<Result<(), WorkError>> + Send> {
    WorkFn::new(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Err(err.clone()))
    })
}

#[tokio::test(start_paused = true)]
async fn success_on_first_attempt() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(3, Duration::from_millis(10))).with_subscriber(rec.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let value = retrier.run(scripted(calls.clone(), vec![])).await.unwrap();

    assert_eq!(value, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(rec.kinds().is_empty());
}

#[tokio::test(start_paused = true)]
async fn predicate_rejection_calls_work_once() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(5, Duration::from_millis(10))).with_subscriber(rec.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let plan = retrier.plan_if(|_: &WorkError| false);
    let err = retrier
        .execute(always(calls.clone(), WorkError::fail("denied")), plan, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(err.attempts(), 1);
    assert_eq!(err.into_inner(), Some(WorkError::fail("denied")));
    assert_eq!(rec.kinds(), vec![EventKind::GivingUp]);
}

#[tokio::test(start_paused = true)]
async fn default_plan_gives_up_on_fatal() {
    let retrier = Retrier::new(config(5, Duration::from_millis(10)));
    let calls = Arc::new(AtomicU32::new(0));

    let err = retrier
        .run(always(calls.clone(), WorkError::fatal("bad request")))
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        err,
        RetryError::Failed {
            attempts: 1,
            error: WorkError::Fatal { .. }
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn succeeds_on_third_attempt_after_two_waits() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(3, Duration::from_millis(100))).with_subscriber(rec.clone());
    let calls = Arc::new(AtomicU32::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_by_backoff = seen.clone();
    let plan = retrier
        .plan_if(|_: &WorkError| true)
        .backoff(move |attempt: u32, _: &WorkError| {
            seen_by_backoff.lock().unwrap().push(attempt);
            Duration::from_millis(100)
        });
    let work = scripted(calls.clone(), vec![WorkError::fail("one"), WorkError::fail("two")]);

    let start = Instant::now();
    let value = retrier.execute(work, plan, &CancellationToken::new()).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(value, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert!(elapsed >= Duration::from_millis(200), "waited only {elapsed:?}");
    assert!(elapsed < Duration::from_millis(250), "waited {elapsed:?}");
    assert_eq!(rec.kinds(), vec![EventKind::Retrying, EventKind::Retrying]);
    assert_eq!(rec.attempts(), vec![Some(1), Some(2)]);
}

#[tokio::test(start_paused = true)]
async fn exhausts_after_max_attempts() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(2, Duration::ZERO)).with_subscriber(rec.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let plan = retrier.plan_if(|_: &WorkError| true);
    let err = retrier
        .execute(always(calls.clone(), WorkError::fail("still down")), plan, &CancellationToken::new())
        .await
        .unwrap_err();

    // Attempts 1 and 2 are within the ceiling, attempt 3 exceeds it.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(err.attempts(), 3);
    assert_eq!(
        rec.kinds(),
        vec![EventKind::Retrying, EventKind::Retrying, EventKind::GivingUp]
    );
}

#[tokio::test(start_paused = true)]
async fn transient_failures_ignore_max_attempts_until_cancelled() {
    let retrier = Retrier::new(config(1, Duration::from_millis(10)));
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();

    let counter = calls.clone();
    let canceller = token.clone();
    let work = WorkFn::new(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if n == 5 {
            canceller.cancel();
        }
        std::future::ready(Err::<(), _>(WorkError::transient("blip")))
    });

    let err = retrier.run_until(work, &token).await.unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert!(matches!(err, RetryError::Canceled { attempts: 5 }));
}

#[tokio::test(start_paused = true)]
async fn classifier_overrides_rejecting_predicate() {
    let retrier = Retrier::new(config(1, Duration::ZERO));
    let calls = Arc::new(AtomicU32::new(0));

    let plan = retrier
        .plan_unclassified(|_: &WorkError| false)
        .classify(|e: &WorkError| matches!(e, WorkError::Transient { .. }));
    let work = scripted(
        calls.clone(),
        vec![
            WorkError::transient("a"),
            WorkError::transient("b"),
            WorkError::transient("c"),
        ],
    );

    let value = retrier.execute(work, plan, &CancellationToken::new()).await.unwrap();
    assert_eq!(value, 4);
}

#[tokio::test(start_paused = true)]
async fn rejecting_predicate_still_retries_transient() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(1, Duration::from_millis(10))).with_subscriber(rec.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let plan = retrier.plan_if(|_: &WorkError| false);
    let work = scripted(
        calls.clone(),
        vec![WorkError::transient("blip"), WorkError::transient("blip")],
    );

    let value = retrier.execute(work, plan, &CancellationToken::new()).await.unwrap();

    assert_eq!(value, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(rec.kinds(), vec![EventKind::Retrying, EventKind::Retrying]);
    assert!(rec.0.lock().unwrap().iter().all(|e| e.transient == Some(true)));
}

#[tokio::test(start_paused = true)]
async fn transient_io_errors_survive_rejecting_predicate() {
    let retrier = Retrier::new(config(1, Duration::ZERO));
    let mut n = 0u32;
    let work = BlockingFn::new(move || {
        n += 1;
        if n < 3 {
            Err(std::io::Error::from(std::io::ErrorKind::TimedOut))
        } else {
            Ok(n)
        }
    });

    let plan = retrier.plan_if(|_: &std::io::Error| false);
    assert_eq!(retrier.execute(work, plan, &CancellationToken::new()).await.unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn unclassified_plan_gives_up_on_tagged_failure() {
    let retrier = Retrier::new(config(5, Duration::ZERO));
    let calls = Arc::new(AtomicU32::new(0));

    let plan = retrier.plan_unclassified(|_: &WorkError| false);
    let err = retrier
        .execute(always(calls.clone(), WorkError::transient("blip")), plan, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(err.into_inner(), Some(WorkError::transient("blip")));
}

#[tokio::test(start_paused = true)]
async fn pre_cancelled_token_runs_nothing() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(3, Duration::from_millis(10))).with_subscriber(rec.clone());
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();
    token.cancel();

    let err = retrier
        .run_until(scripted(calls.clone(), vec![]), &token)
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(matches!(err, RetryError::Canceled { attempts: 0 }));
    assert_eq!(rec.kinds(), vec![EventKind::Canceled]);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_wait_aborts_promptly() {
    let retrier = Retrier::new(config(3, Duration::from_secs(10)));
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let plan = retrier.plan_if(|_: &WorkError| true);
    let start = Instant::now();
    let err = retrier
        .execute(always(calls.clone(), WorkError::fail("boom")), plan, &token)
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(err.is_canceled());
    assert_eq!(err.attempts(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(elapsed < Duration::from_secs(1), "wait not aborted: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn cancel_after_success_is_ignored() {
    let retrier = Retrier::new(config(3, Duration::from_millis(10)));
    let token = CancellationToken::new();

    let canceller = token.clone();
    let work = WorkFn::new(move || {
        canceller.cancel();
        std::future::ready(Ok::<_, WorkError>("done"))
    });

    assert_eq!(retrier.run_until(work, &token).await.unwrap(), "done");
}

#[tokio::test(start_paused = true)]
async fn cancel_while_failing_skips_policy() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(3, Duration::from_millis(10))).with_subscriber(rec.clone());
    let token = CancellationToken::new();
    let backoff_calls = Arc::new(AtomicU32::new(0));

    let canceller = token.clone();
    let work = WorkFn::new(move || {
        canceller.cancel();
        std::future::ready(Err::<(), _>(WorkError::transient("blip")))
    });
    let counted = backoff_calls.clone();
    let plan = retrier.plan::<WorkError>().backoff(move |_: u32, _: &WorkError| {
        counted.fetch_add(1, Ordering::SeqCst);
        Duration::from_millis(10)
    });

    let err = retrier.execute(work, plan, &token).await.unwrap_err();

    assert!(matches!(err, RetryError::Canceled { attempts: 1 }));
    assert_eq!(backoff_calls.load(Ordering::SeqCst), 0);
    assert_eq!(rec.kinds(), vec![EventKind::Canceled]);
}

#[tokio::test(start_paused = true)]
async fn zero_delay_retries_back_to_back() {
    let retrier = Retrier::new(config(5, Duration::ZERO));
    let calls = Arc::new(AtomicU32::new(0));
    let work = scripted(
        calls.clone(),
        vec![WorkError::transient("a"), WorkError::transient("b")],
    );

    let start = Instant::now();
    assert_eq!(retrier.run(work).await.unwrap(), 3);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn linear_policy_drives_waits() {
    let retrier = Retrier::new(config(5, Duration::ZERO));
    let calls = Arc::new(AtomicU32::new(0));
    let plan = retrier.plan::<WorkError>().backoff(LinearBackoff {
        increment: Duration::from_millis(100),
        max_count: 2,
    });
    let work = scripted(
        calls.clone(),
        vec![
            WorkError::transient("a"),
            WorkError::transient("b"),
            WorkError::transient("c"),
        ],
    );

    let start = Instant::now();
    assert_eq!(retrier.execute(work, plan, &CancellationToken::new()).await.unwrap(), 4);
    // 100ms + 200ms + 200ms (capped at max_count = 2).
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(500), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(550), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn events_carry_failure_and_operation() {
    let rec = Arc::new(Recorder::default());
    let retrier = Retrier::new(config(1, Duration::from_millis(20))).with_subscriber(rec.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let plan = retrier.plan_if(|_: &WorkError| true).named("twin-sync");
    let _ = retrier
        .execute(always(calls.clone(), WorkError::fail("503")), plan, &CancellationToken::new())
        .await;

    let events = rec.0.lock().unwrap();
    assert_eq!(events.len(), 2);

    let retrying = &events[0];
    assert_eq!(retrying.kind, EventKind::Retrying);
    assert_eq!(retrying.attempt, Some(1));
    assert_eq!(retrying.delay_ms, Some(20));
    assert_eq!(retrying.transient, Some(false));
    assert_eq!(retrying.reason.as_deref(), Some("execution failed: 503"));
    assert_eq!(retrying.operation.as_deref(), Some("twin-sync"));

    let giving_up = &events[1];
    assert_eq!(giving_up.kind, EventKind::GivingUp);
    assert_eq!(giving_up.attempt, Some(2));
    assert!(!retrying.is_terminal());
    assert!(giving_up.is_terminal());
    assert!(giving_up.seq > retrying.seq);
}

#[tokio::test(start_paused = true)]
async fn blocking_work_inside_async_engine() {
    let retrier = Retrier::new(config(3, Duration::from_millis(5)));
    let mut n = 0u32;
    let work = BlockingFn::new(move || {
        n += 1;
        if n < 2 { Err(WorkError::transient("busy")) } else { Ok(()) }
    });

    retrier.run(work).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_invocations_run_concurrently() {
    let retrier = Retrier::new(config(3, Duration::from_millis(1)));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let retrier = retrier.clone();
            tokio::spawn(async move {
                let calls = Arc::new(AtomicU32::new(0));
                let work = scripted(
                    calls.clone(),
                    vec![WorkError::transient("a"), WorkError::transient("b")],
                );
                let value = retrier.run(work).await.unwrap();
                (value, calls.load(Ordering::SeqCst))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), (3, 3));
    }
}

#[test]
fn blocking_entry_point_retries() {
    let retrier = Retrier::new(config(3, Duration::from_millis(1)));
    let mut n = 0u32;

    let value = retrier
        .run_blocking(|| {
            n += 1;
            if n < 3 { Err(WorkError::transient("busy")) } else { Ok(n * 10) }
        })
        .unwrap();

    assert_eq!(value, 30);
}

#[test]
fn blocking_entry_point_returns_original_failure() {
    let retrier = Retrier::new(config(3, Duration::from_millis(1)));
    let plan = RetryPlan::new(retrier.config(), |e: &std::io::Error| {
        e.kind() == std::io::ErrorKind::TimedOut
    });

    let err = retrier
        .execute_blocking(
            || Err::<(), _>(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")),
            plan,
            &CancellationToken::new(),
        )
        .unwrap_err();

    assert_eq!(err.attempts(), 1);
    let inner = err.into_inner().unwrap();
    assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
    assert_eq!(inner.to_string(), "missing");
}

#[test]
fn blocking_wait_is_interrupted_by_other_thread() {
    let retrier = Retrier::new(config(3, Duration::from_secs(30)));
    let token = CancellationToken::new();

    let canceller = token.clone();
    let trigger = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        canceller.cancel();
    });

    let start = std::time::Instant::now();
    let err = retrier
        .execute_blocking(
            || Err::<(), _>(WorkError::fail("down")),
            retrier.plan_if(|_: &WorkError| true),
            &token,
        )
        .unwrap_err();

    trigger.join().unwrap();
    assert!(err.is_canceled());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn blocking_entry_point_inside_runtime_is_an_error() {
    let retrier = Retrier::new(config(3, Duration::from_millis(1)));
    let calls = Arc::new(AtomicU32::new(0));

    let counter = calls.clone();
    let err = retrier
        .run_blocking(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, WorkError>(())
        })
        .unwrap_err();

    assert_eq!(err.as_label(), "retry_runtime");
    assert_eq!(err.attempts(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
