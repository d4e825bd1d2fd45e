//! Extension trait for running a future after a yield.

use std::{
    pin::Pin,
    task::{Context, Poll, ready},
};

use futures::FutureExt;
use pin_project_lite::pin_project;

use crate::{Host, YieldError, YieldToMain, host};

/// Extend `Future` with yield-first operations.
pub trait YieldExt: Future {
    /// Yields to the process-wide host before polling `self` for the first time.
    ///
    /// The yield starts on the first poll of the returned future, not when
    /// this method is called.
    fn yield_first(self) -> YieldThen<'static, Self>
    where
        Self: Sized,
    {
        YieldThen::new(self, host::global())
    }

    /// Like [`yield_first`](Self::yield_first) but yields through the given host.
    fn yield_first_on(self, host: &Host) -> YieldThen<'_, Self>
    where
        Self: Sized,
    {
        YieldThen::new(self, host)
    }
}

impl<T> YieldExt for T where T: Future {}

pin_project! {
    /// A future that yields to the host once before polling its inner future.
    ///
    /// If the yield fails the inner future is never polled and the error is
    /// returned instead.
    #[must_use = "futures do nothing unless polled or .awaited"]
    pub struct YieldThen<'h, F> {
        #[pin]
        future: F,
        host: &'h Host,
        yielding: Option<YieldToMain>,
        yielded: bool,
    }
}

impl<'h, F> YieldThen<'h, F> {
    /// Creates a `YieldThen` that yields through `host` before running `future`.
    ///
    /// A more convenient way to construct this is via the
    /// [`yield_first()`](YieldExt::yield_first) operator.
    pub fn new(future: F, host: &'h Host) -> Self {
        YieldThen {
            future,
            host,
            yielding: None,
            yielded: false,
        }
    }

    /// Consumes the `YieldThen` and returns the inner future.
    pub fn inner(self) -> F {
        self.future
    }
}

impl<F> Future for YieldThen<'_, F>
where
    F: Future,
{
    type Output = Result<F::Output, YieldError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if !*this.yielded {
            let host = *this.host;
            let yielding = this.yielding.get_or_insert_with(|| host.yield_to_main());
            let result = ready!(yielding.poll_unpin(cx));
            *this.yielding = None;
            *this.yielded = true;
            result?;
        }
        this.future.poll(cx).map(Ok)
    }
}
