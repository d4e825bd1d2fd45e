//! Capabilities backed by the `tokio` runtime.
//!
//! Install [`TokioYield`] to make yields go through `tokio`'s own cooperative
//! yield, or build a host with [`TokioDeferred`] to schedule fallback
//! resumptions as `tokio` tasks instead of on a thread pool.

use std::time::Duration;

use tokio::runtime::Handle;

use crate::{
    YieldError,
    deferred::{Callback, Deferred},
    native::{NativeFuture, NativeYield},
};

/// Native yield facility backed by [`tokio::task::yield_now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioYield;

impl NativeYield for TokioYield {
    fn yield_now(&self) -> NativeFuture {
        Box::pin(async {
            tokio::task::yield_now().await;
            Ok(())
        })
    }
}

/// Deferred-execution facility that spawns resumptions onto a `tokio` runtime.
///
/// Without an explicit handle, the runtime of the calling context is used.
/// Deferring outside of a runtime fails with [`YieldError::Deferred`].
#[derive(Clone, Debug, Default)]
pub struct TokioDeferred {
    handle: Option<Handle>,
}

impl TokioDeferred {
    /// Uses whatever runtime is current when a resumption is deferred.
    #[must_use]
    pub fn new() -> Self {
        TokioDeferred { handle: None }
    }

    /// Always spawns onto the runtime behind `handle`.
    #[must_use]
    pub fn with_handle(handle: Handle) -> Self {
        TokioDeferred {
            handle: Some(handle),
        }
    }
}

impl Deferred for TokioDeferred {
    fn defer(&self, delay: Duration, callback: Callback) -> Result<(), YieldError> {
        let handle = match &self.handle {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(YieldError::deferred)?,
        };
        handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            callback();
        });
        Ok(())
    }
}
