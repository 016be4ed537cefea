//! Tests de integración: combinan varias primitivas del laboratorio
//! tests/integration_test.rs

use channel_lab::context::Context;
use channel_lab::error::{ContextError, LabError};
use channel_lab::leak::TaskTracker;
use channel_lab::pipeline::Stage;
use channel_lab::wait_group::WaitGroup;
use channel_lab::worker_pool::WorkerPool;
use crossbeam::channel;
use std::time::Duration;

#[test]
fn test_pool_workers_observe_cancellation() {
    let (ctx, cancel) = Context::with_cancel(&Context::background());
    let job_ctx = ctx.clone();

    let pool = WorkerPool::new(2, 8, move |_, n: u32| -> Result<u32, LabError> {
        job_ctx.check()?;
        Ok(n + 1)
    })
    .unwrap();

    for n in 0..4 {
        pool.submit(n).unwrap();
    }
    let before = pool.shutdown().unwrap();
    assert!(before.results.iter().all(|(_, r)| r.is_ok()));

    cancel.cancel();
    let pool = WorkerPool::new(2, 8, move |_, _: u32| ctx.check()).unwrap();
    pool.submit(0).unwrap();
    let after = pool.shutdown().unwrap();
    assert!(matches!(
        after.results[0].1,
        Err(LabError::Context(ContextError::Canceled))
    ));
}

#[test]
fn test_tracked_tasks_stop_on_timeout() {
    let tracker = TaskTracker::new();
    let (ctx, _cancel) = Context::with_timeout(&Context::background(), Duration::from_millis(30));

    for i in 0..3 {
        let ctx = ctx.clone();
        tracker
            .spawn(&format!("ticker-{}", i), move || ctx.wait())
            .unwrap();
    }

    assert!(tracker.wait_idle(Duration::from_secs(2)));
    assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
}

#[test]
fn test_pipeline_feeds_wait_group() {
    let wg = WaitGroup::new();
    let (tx, rx) = channel::unbounded();

    let doubled = Stage::source(1..=5, 1)
        .map(|n: i32| n * 2)
        .collect()
        .unwrap();

    for n in doubled {
        let guard = wg.guard();
        let tx = tx.clone();
        std::thread::spawn(move || {
            let _guard = guard;
            let _ = tx.send(n);
        });
    }
    drop(tx);

    assert!(wg.wait_timeout(Duration::from_secs(1)));
    let mut got: Vec<i32> = rx.iter().collect();
    got.sort_unstable();
    assert_eq!(got, vec![2, 4, 6, 8, 10]);
}
