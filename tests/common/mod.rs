#![allow(dead_code)]

use std::{
    error::Error,
    fmt, io,
    sync::{Arc, Mutex},
    time::Duration,
};

use yield_to_main::{Callback, Deferred, YieldError};

/// Deferred facility that only records callbacks. Tests decide when (and
/// whether) each one runs.
#[derive(Clone, Default)]
pub struct ManualDeferred {
    pending: Arc<Mutex<Vec<(Duration, Callback)>>>,
}

impl ManualDeferred {
    pub fn take(&self) -> Vec<(Duration, Callback)> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl Deferred for ManualDeferred {
    fn defer(&self, delay: Duration, callback: Callback) -> Result<(), YieldError> {
        self.pending.lock().unwrap().push((delay, callback));
        Ok(())
    }
}

/// Deferred facility whose queue is always closed.
pub struct ClosedDeferred;

impl Deferred for ClosedDeferred {
    fn defer(&self, _delay: Duration, _callback: Callback) -> Result<(), YieldError> {
        Err(YieldError::deferred(io::Error::other("queue closed")))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct HostBusy(pub u32);

impl fmt::Display for HostBusy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host busy ({})", self.0)
    }
}

impl Error for HostBusy {}
