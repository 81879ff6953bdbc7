//! # Registry configuration.
//!
//! Provides [`Config`], the settings a [`Registry`](crate::Registry) is built with.
//!
//! ## Sentinel values
//! - `grace = 0s` → `shutdown()` does not wait; it only reports pending dispatches

use std::time::Duration;

/// Configuration for a [`Registry`](crate::Registry).
///
/// ## Field semantics
/// - `grace`: Maximum wait for in-flight dispatches on `shutdown()` (`0s` = no wait)
/// - `bus_capacity`: Diagnostic event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time [`Registry::shutdown`](crate::Registry::shutdown) waits for
    /// in-flight dispatches before returning `RegistryError::DrainTimeout`.
    pub grace: Duration,

    /// Capacity of the diagnostic event bus.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the shutdown grace period as an `Option`.
    ///
    /// - `None` → do not wait
    /// - `Some(d)` → wait up to `d`
    #[inline]
    pub fn shutdown_grace(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 30s`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            bus_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_grace_means_no_wait() {
        let cfg = Config {
            grace: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.shutdown_grace(), None);
        assert_eq!(Config::default().shutdown_grace(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
