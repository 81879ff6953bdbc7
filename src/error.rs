//! Error types used by the notifier registry.
//!
//! Registration, deregistration and broadcast are infallible. The only
//! fallible surface is waiting for in-flight dispatches:
//!
//! - [`RegistryError`] — raised by [`Registry::drain_timeout`](crate::Registry::drain_timeout)
//!   and [`Registry::shutdown`](crate::Registry::shutdown).
//!
//! The enum provides helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the registry.
///
/// Listener faults never surface here: a panicking dispatch is isolated in its
/// own task and reported as [`EventKind::DispatchPanicked`](crate::EventKind::DispatchPanicked).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Grace period elapsed while dispatches were still running.
    #[error("drain timeout {grace:?} exceeded; {pending} dispatch(es) still in flight")]
    DrainTimeout {
        /// The grace duration that was waited.
        grace: Duration,
        /// Dispatches still running when the grace period elapsed.
        pending: usize,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use notifier::RegistryError;
    /// use std::time::Duration;
    ///
    /// let err = RegistryError::DrainTimeout { grace: Duration::from_secs(1), pending: 3 };
    /// assert_eq!(err.as_label(), "registry_drain_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DrainTimeout { .. } => "registry_drain_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::DrainTimeout { grace, pending } => {
                format!("drain exceeded after {grace:?}; pending dispatches={pending}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_timeout_display() {
        let err = RegistryError::DrainTimeout {
            grace: Duration::from_millis(250),
            pending: 2,
        };
        assert_eq!(
            err.to_string(),
            "drain timeout 250ms exceeded; 2 dispatch(es) still in flight"
        );
        assert_eq!(err.as_message(), "drain exceeded after 250ms; pending dispatches=2");
    }
}
