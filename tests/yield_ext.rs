mod common;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::Poll,
};

use common::{ClosedDeferred, ManualDeferred};
use futures::poll;
use yield_to_main::{Host, YieldError, YieldExt};

#[tokio::test(flavor = "multi_thread")]
async fn inner_future_runs_after_yield() {
    let deferred = ManualDeferred::default();
    let host = Host::builder().deferred(deferred.clone()).build();
    let ran = Arc::new(AtomicBool::new(false));
    let ran_cl = Arc::clone(&ran);

    let mut task = Box::pin(
        async move {
            ran_cl.store(true, Ordering::Relaxed);
            "Result"
        }
        .yield_first_on(&host),
    );
    assert_eq!(deferred.len(), 0, "Yield should start on first poll");

    assert!(poll!(&mut task).is_pending());
    assert!(!ran.load(Ordering::Relaxed), "Inner future must wait for the yield");

    let mut pending = deferred.take();
    assert_eq!(pending.len(), 1, "Exactly one yield should be scheduled");
    (pending.pop().unwrap().1)();

    assert!(matches!(poll!(&mut task), Poll::Ready(Ok("Result"))));
    assert!(ran.load(Ordering::Relaxed), "Inner future should have run");
    assert_eq!(deferred.len(), 0, "No further yields after the first");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_yield_skips_inner_future() {
    let host = Host::builder().deferred(ClosedDeferred).build();
    let ran = Arc::new(AtomicBool::new(false));
    let ran_cl = Arc::clone(&ran);

    let r = async move {
        ran_cl.store(true, Ordering::Relaxed);
    }
    .yield_first_on(&host)
    .await;

    assert!(matches!(r, Err(YieldError::Deferred(_))));
    assert!(!ran.load(Ordering::Relaxed), "Inner future must not run");
}

#[tokio::test(flavor = "multi_thread")]
async fn works_with_default_fallback() {
    let host = Host::new();
    let r = async {
        tokio::task::yield_now().await;
        42
    }
    .yield_first_on(&host)
    .await;
    assert_eq!(r.unwrap(), 42);
}

#[test]
fn inner_returns_wrapped_future() {
    let host = Host::new();
    let wrapped = std::future::ready(3).yield_first_on(&host);
    let inner = wrapped.inner();
    assert_eq!(futures_lite::future::block_on(inner), 3);
}
