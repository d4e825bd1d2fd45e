use std::{
    fmt, mem,
    pin::Pin,
    task::{Context, Poll, ready},
};

use futures::{FutureExt, channel::oneshot, future::FusedFuture};

use crate::{YieldError, host, native::NativeFuture};

/// Yields to the host scheduler using the process-wide [`Host`](crate::Host).
///
/// If a native yield facility is installed on [`host::global`], it is invoked
/// and its result is passed through. Otherwise a resumption is scheduled with
/// zero delay on the host's deferred-execution facility. Which path is taken
/// is decided anew on every call.
///
/// The returned future resolves once the host has given other pending work a
/// chance to run. It never fails on its own; errors from the facilities are
/// handed back unchanged.
///
/// # Example
/// ```
/// # use yield_to_main::yield_to_main;
/// #
/// # async {
/// async fn process_items(items: Vec<u32>) -> Result<u64, yield_to_main::YieldError> {
///     let mut sum = 0;
///     for (i, item) in items.into_iter().enumerate() {
///         if i % 1000 == 0 {
///             yield_to_main().await?;
///         }
///         sum += u64::from(item);
///     }
///     Ok(sum)
/// }
/// # };
/// ```
pub fn yield_to_main() -> YieldToMain {
    host::global().yield_to_main()
}

enum State {
    Native(NativeFuture),
    Deferred {
        receiver: oneshot::Receiver<()>,
        yielded: bool,
    },
    Failed(YieldError),
    Done,
}

/// Future returned by [`yield_to_main`] and
/// [`Host::yield_to_main`](crate::Host::yield_to_main).
///
/// The resumption is already scheduled when this value is created. Dropping it
/// discards the continuation; there is no other way to cancel a yield.
#[must_use = "the yield only takes effect when awaited"]
pub struct YieldToMain {
    state: State,
}

impl YieldToMain {
    pub(crate) fn native(future: NativeFuture) -> Self {
        YieldToMain {
            state: State::Native(future),
        }
    }

    pub(crate) fn deferred(receiver: oneshot::Receiver<()>) -> Self {
        YieldToMain {
            state: State::Deferred {
                receiver,
                yielded: false,
            },
        }
    }

    pub(crate) fn failed(error: YieldError) -> Self {
        YieldToMain {
            state: State::Failed(error),
        }
    }

    /// Returns `true` if this yield was delegated to a native facility.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self.state, State::Native(_))
    }
}

impl fmt::Debug for YieldToMain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            State::Native(_) => "Native",
            State::Deferred { .. } => "Deferred",
            State::Failed(_) => "Failed",
            State::Done => "Done",
        };
        f.debug_struct("YieldToMain")
            .field("state", &state)
            .finish()
    }
}

impl Future for YieldToMain {
    type Output = Result<(), YieldError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let State::Failed(_) | State::Done = this.state {
            return match mem::replace(&mut this.state, State::Done) {
                State::Failed(e) => Poll::Ready(Err(e)),
                _ => panic!("`YieldToMain` polled after completion"),
            };
        }

        let output = match &mut this.state {
            State::Native(future) => ready!(future.as_mut().poll(cx)),
            State::Deferred { receiver, yielded } => {
                // Never resolve on the first poll, even if the callback already ran.
                if !*yielded {
                    *yielded = true;
                    cx.waker().wake_by_ref();
                    return Poll::Pending;
                }
                ready!(receiver.poll_unpin(cx)).map_err(|_| {
                    log::warn!("deferred resumption dropped without running");
                    YieldError::Abandoned
                })
            }
            State::Failed(_) | State::Done => unreachable!(),
        };
        this.state = State::Done;
        Poll::Ready(output)
    }
}

impl FusedFuture for YieldToMain {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}
