//! Deferred-execution capability used when no native yield is available.
//!
//! A [`Deferred`] facility runs a callback asynchronously after at least a
//! given delay. Yields always request [`Duration::ZERO`], meaning "as soon as
//! the host's task queue permits".

use std::{
    sync::OnceLock,
    thread,
    time::{Duration, Instant},
};

use futures::executor::{ThreadPool, ThreadPoolBuilder};

use crate::YieldError;

/// A resumption callback handed to a [`Deferred`] facility.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// A host facility for running a callback asynchronously after a minimum delay.
///
/// Implementations must either run `callback` exactly once at some point after
/// `delay` has elapsed, or return an error. Dropping the callback without
/// running it is tolerated, the pending yield then fails with
/// [`YieldError::Abandoned`].
pub trait Deferred: Send + Sync {
    /// Schedules `callback` to run asynchronously once `delay` has elapsed.
    ///
    /// A zero `delay` means "as soon as the host's task queue permits". The
    /// callback must not be run synchronously inside this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the callback could not be scheduled. The error is
    /// handed to whoever awaits the pending yield unchanged.
    fn defer(&self, delay: Duration, callback: Callback) -> Result<(), YieldError>;
}

pub(crate) const DEFAULT_POOL_SIZE: usize = 1;
pub(crate) const DEFAULT_NAME_PREFIX: &str = "yield-to-main-";

/// Executor agnostic [`Deferred`] facility backed by a thread pool.
///
/// The pool is created the first time a callback is deferred. Callbacks with a
/// zero delay are queued as the next job on the pool. Non-zero delays wait on a
/// separate timer thread and are queued on the pool once they are due.
pub struct ThreadPoolDeferred {
    pool: OnceLock<ThreadPool>,
    pool_size: usize,
    name_prefix: String,
}

impl ThreadPoolDeferred {
    /// Creates a facility with a single-threaded pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_POOL_SIZE, DEFAULT_NAME_PREFIX)
    }

    /// Creates a facility whose pool has `pool_size` threads (at least one)
    /// named with `name_prefix` followed by their index.
    #[must_use]
    pub fn with_config(pool_size: usize, name_prefix: impl Into<String>) -> Self {
        ThreadPoolDeferred {
            pool: OnceLock::new(),
            pool_size: pool_size.max(1),
            name_prefix: name_prefix.into(),
        }
    }

    /// Number of worker threads the pool is (or will be) created with.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    fn pool(&self) -> Result<&ThreadPool, YieldError> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }
        let pool = ThreadPoolBuilder::new()
            .pool_size(self.pool_size)
            .name_prefix(self.name_prefix.as_str())
            .create()
            .map_err(YieldError::deferred)?;
        log::debug!(
            "created deferred-execution pool with {} thread(s)",
            self.pool_size
        );
        // Losing a creation race just drops the extra pool.
        Ok(self.pool.get_or_init(|| pool))
    }
}

impl Default for ThreadPoolDeferred {
    fn default() -> Self {
        Self::new()
    }
}

impl Deferred for ThreadPoolDeferred {
    fn defer(&self, delay: Duration, callback: Callback) -> Result<(), YieldError> {
        let pool = self.pool()?;
        if delay.is_zero() {
            pool.spawn_ok(async move { callback() });
            return Ok(());
        }
        // Wait off the pool so zero-delay callbacks are never queued behind a sleep.
        let due = Instant::now() + delay;
        let pool = pool.clone();
        thread::Builder::new()
            .name(format!("{}timer", self.name_prefix))
            .spawn(move || {
                thread::sleep(due.saturating_duration_since(Instant::now()));
                pool.spawn_ok(async move { callback() });
            })
            .map_err(YieldError::deferred)?;
        Ok(())
    }
}
