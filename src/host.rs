//! The capability table a yield is resolved against.
//!
//! A [`Host`] describes what the embedding environment offers: an optional
//! native yield facility and a deferred-execution facility to fall back on.
//! The native slot can be filled or cleared at any time and every yield reads
//! it again, so a facility that is polyfilled, mocked or removed after start-up
//! is picked up by the very next call.
//!
//! Most code uses the process-wide table returned by [`global`] through
//! [`yield_to_main`](crate::yield_to_main). Tests and embedders that need
//! isolation create their own `Host`.

use std::{
    sync::{Arc, OnceLock, PoisonError, RwLock},
    time::Duration,
};

use futures::channel::oneshot;

use crate::{
    YieldToMain,
    deferred::{Callback, DEFAULT_NAME_PREFIX, DEFAULT_POOL_SIZE, Deferred, ThreadPoolDeferred},
    native::NativeYield,
};

static GLOBAL: OnceLock<Host> = OnceLock::new();

/// Returns the process-wide host, creating it with default configuration on
/// first use.
///
/// The default host has no native yield facility installed and falls back to
/// a [`ThreadPoolDeferred`] facility.
pub fn global() -> &'static Host {
    GLOBAL.get_or_init(Host::new)
}

/// Runtime-provided capability table consulted on every yield.
pub struct Host {
    native: RwLock<Option<Arc<dyn NativeYield>>>,
    deferred: Arc<dyn Deferred>,
}

impl Host {
    /// Creates a host with no native facility and the default thread-pool
    /// fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a [`HostBuilder`] for configuring a new host.
    #[must_use]
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    /// Installs a native yield facility, returning the one it replaces.
    ///
    /// Yields started after this call are delegated to `native`. Yields
    /// already pending are unaffected.
    pub fn install_native(
        &self,
        native: impl NativeYield + 'static,
    ) -> Option<Arc<dyn NativeYield>> {
        log::debug!("native yield facility installed");
        self.write_native(Some(Arc::new(native)))
    }

    /// Removes the native yield facility, returning it if one was installed.
    ///
    /// Yields started after this call use the deferred-execution fallback.
    pub fn remove_native(&self) -> Option<Arc<dyn NativeYield>> {
        let previous = self.write_native(None);
        if previous.is_some() {
            log::debug!("native yield facility removed");
        }
        previous
    }

    /// Returns `true` if a native yield facility is currently installed.
    #[must_use]
    pub fn has_native(&self) -> bool {
        self.native
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Yields to the host scheduler.
    ///
    /// The native slot is read on every call. If a facility is installed it is
    /// invoked once, right away, and the returned [`YieldToMain`] resolves
    /// exactly as the facility's future does. Otherwise a resumption is
    /// scheduled with zero delay on the deferred-execution facility.
    ///
    /// This never fails synchronously. Scheduling failures are reported when
    /// the returned future is awaited.
    pub fn yield_to_main(&self) -> YieldToMain {
        // Clone out of the slot so the facility is never called under the lock.
        let native = self
            .native
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(native) = native {
            log::trace!("yielding through the native facility");
            return YieldToMain::native(native.yield_now());
        }

        log::trace!("no native yield facility, deferring resumption");
        let (sender, receiver) = oneshot::channel();
        let resume: Callback = Box::new(move || {
            // The caller may have dropped the yield already.
            let _ = sender.send(());
        });
        match self.deferred.defer(Duration::ZERO, resume) {
            Ok(()) => YieldToMain::deferred(receiver),
            Err(e) => {
                log::warn!("failed to schedule deferred resumption: {e}");
                YieldToMain::failed(e)
            }
        }
    }

    fn write_native(&self, native: Option<Arc<dyn NativeYield>>) -> Option<Arc<dyn NativeYield>> {
        let mut slot = self.native.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, native)
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Host`].
///
/// Without further configuration the built host has no native facility and
/// falls back to a single-threaded [`ThreadPoolDeferred`].
pub struct HostBuilder {
    native: Option<Arc<dyn NativeYield>>,
    deferred: Option<Arc<dyn Deferred>>,
    pool_size: usize,
    name_prefix: String,
}

impl HostBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        HostBuilder {
            native: None,
            deferred: None,
            pool_size: DEFAULT_POOL_SIZE,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }

    /// Sets the native yield facility the host starts with.
    pub fn native(&mut self, native: impl NativeYield + 'static) -> &mut Self {
        self.native = Some(Arc::new(native));
        self
    }

    /// Replaces the default thread-pool fallback with a custom
    /// deferred-execution facility.
    ///
    /// When set, [`pool_size`](Self::pool_size) and
    /// [`name_prefix`](Self::name_prefix) have no effect.
    pub fn deferred(&mut self, deferred: impl Deferred + 'static) -> &mut Self {
        self.deferred = Some(Arc::new(deferred));
        self
    }

    /// Number of threads in the default fallback pool. Values below one are
    /// raised to one.
    pub fn pool_size(&mut self, size: usize) -> &mut Self {
        self.pool_size = size;
        self
    }

    /// Thread name prefix for the default fallback pool.
    pub fn name_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Builds the [`Host`].
    ///
    /// The default fallback pool is not started until the first deferred yield.
    #[must_use]
    pub fn build(&self) -> Host {
        let deferred: Arc<dyn Deferred> = match &self.deferred {
            Some(deferred) => Arc::clone(deferred),
            None => Arc::new(ThreadPoolDeferred::with_config(
                self.pool_size,
                self.name_prefix.clone(),
            )),
        };
        Host {
            native: RwLock::new(self.native.clone()),
            deferred,
        }
    }
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}
