use std::{error::Error, fmt};

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Represents the ways awaiting a yield can fail.
///
/// A yield never fails on its own. Errors only come from the facilities it is
/// delegated to, and they are carried through without being translated, so the
/// original value can always be recovered with [`YieldError::downcast_ref`].
#[derive(Debug)]
pub enum YieldError {
    /// The native yield facility failed. Holds the facility's own error.
    Native(BoxError),

    /// The deferred-execution facility could not schedule the resumption.
    Deferred(BoxError),

    /// The deferred-execution facility dropped the resumption callback
    /// without ever running it.
    Abandoned,
}

impl YieldError {
    /// Wraps an error produced by a native yield facility.
    pub fn native(error: impl Into<BoxError>) -> Self {
        YieldError::Native(error.into())
    }

    /// Wraps an error produced while scheduling a deferred resumption.
    pub fn deferred(error: impl Into<BoxError>) -> Self {
        YieldError::Deferred(error.into())
    }

    /// Returns the wrapped facility error if it is of type `E`.
    ///
    /// Returns `None` for [`YieldError::Abandoned`] or when the wrapped error
    /// has a different type.
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            YieldError::Native(e) | YieldError::Deferred(e) => e.downcast_ref::<E>(),
            YieldError::Abandoned => None,
        }
    }

    /// Consumes the error and returns the wrapped facility error, if any.
    #[must_use]
    pub fn into_inner(self) -> Option<BoxError> {
        match self {
            YieldError::Native(e) | YieldError::Deferred(e) => Some(e),
            YieldError::Abandoned => None,
        }
    }

    /// Returns `true` if the error came from the native yield facility.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, YieldError::Native(_))
    }
}

impl fmt::Display for YieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YieldError::Native(e) => write!(f, "Native yield failed: {e}"),
            YieldError::Deferred(e) => write!(f, "Failed to schedule deferred resumption: {e}"),
            YieldError::Abandoned => {
                write!(f, "Deferred resumption was dropped without running")
            }
        }
    }
}

impl Error for YieldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            YieldError::Native(e) | YieldError::Deferred(e) => Some(e.as_ref()),
            YieldError::Abandoned => None,
        }
    }
}
