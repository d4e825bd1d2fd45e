//! Cooperative yielding to the host scheduler.
//!
//! `yield_to_main` lets long-running loops break themselves into slices: each
//! `yield_to_main().await` hands control back to the host so pending
//! higher-priority work can run before the caller resumes.
//!
//! What "the host" offers is described by a [`Host`] capability table:
//! - If a native yield facility ([`NativeYield`]) is installed, every yield is
//!   delegated to it and its result is passed through unchanged.
//! - Otherwise the resumption is scheduled with zero delay on a
//!   deferred-execution facility ([`Deferred`]), by default a small
//!   executor-agnostic thread pool.
//!
//! The table is consulted again on every call, so installing or removing the
//! native facility takes effect immediately.
//!
//! The crate is designed to work independently of any specific async runtime.
//! With the `tokio` feature, capabilities backed by `tokio` are available as
//! well.

pub mod deferred;
pub mod error;
pub mod host;
pub mod native;
#[cfg(feature = "tokio")]
pub mod rt_tokio;
pub mod yield_ext;
mod yield_now;

pub use deferred::{Callback, Deferred, ThreadPoolDeferred};
pub use error::YieldError;
pub use host::{Host, HostBuilder};
pub use native::{NativeFuture, NativeYield};
#[cfg(feature = "tokio")]
pub use rt_tokio::{TokioDeferred, TokioYield};
pub use yield_ext::{YieldExt, YieldThen};
pub use yield_now::{YieldToMain, yield_to_main};
