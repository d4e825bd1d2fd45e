//! Native cooperative-yield capability.
//!
//! A host that has its own way of ceding priority to queued work exposes it
//! through [`NativeYield`]. When such a capability is installed on a
//! [`Host`](crate::Host), every yield is delegated to it.

use std::{error::Error, future::Future, pin::Pin};

use futures::{FutureExt, TryFutureExt};

use crate::YieldError;

/// The future returned by a native yield facility.
pub type NativeFuture = Pin<Box<dyn Future<Output = Result<(), YieldError>> + Send + 'static>>;

/// A host-provided facility that lets the caller cede priority to other
/// pending work and resume later.
///
/// The returned future must resolve once the host has given other work a
/// chance to run. Any error it resolves with is handed to the caller of
/// [`yield_to_main`](crate::yield_to_main) unchanged.
pub trait NativeYield: Send + Sync {
    /// Starts a yield and returns a future that resolves once the host has let
    /// other pending work run.
    ///
    /// Called exactly once per [`Host::yield_to_main`](crate::Host::yield_to_main)
    /// while this facility is installed.
    fn yield_now(&self) -> NativeFuture;
}

/// A [`NativeYield`] built from a closure. Created by [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

/// Creates a [`NativeYield`] from a closure returning a fallible future.
///
/// Whatever the future resolves with on success is discarded. Errors are
/// wrapped in [`YieldError::Native`] and can be recovered with
/// [`YieldError::downcast_ref`].
///
/// # Example
/// ```
/// # use yield_to_main::{Host, native};
/// #
/// let host = Host::new();
/// host.install_native(native::from_fn(|| async {
///     // Hand control to the host's own scheduler here.
///     Ok::<_, std::convert::Infallible>(42)
/// }));
/// assert!(host.has_native());
/// ```
pub fn from_fn<F, Fut, T, E>(f: F) -> FromFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    FromFn { f }
}

impl<F, Fut, T, E> NativeYield for FromFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    fn yield_now(&self) -> NativeFuture {
        (self.f)()
            .map_ok(|_| ())
            .map_err(YieldError::native)
            .boxed()
    }
}
