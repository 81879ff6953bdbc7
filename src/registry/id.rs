//! # Listener identity.
//!
//! Listeners are compared by identity, not by value: two `Arc`s pointing at the
//! same allocation are the same listener, two equal values in different
//! allocations are different listeners.

use std::fmt;
use std::sync::Arc;

/// Identity token of a registered listener.
///
/// Derived from the address of the `Arc` allocation. The registry keeps a
/// strong reference to every member, so an id cannot be reused by another
/// allocation while its listener is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

impl ListenerId {
    /// Returns the identity of the listener behind `listener`.
    ///
    /// Works for trait objects too: only the data pointer is used, vtable
    /// metadata is discarded.
    #[inline]
    pub fn of<L: ?Sized>(listener: &Arc<L>) -> Self {
        Self(Arc::as_ptr(listener) as *const () as usize)
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{:#x}", self.0)
    }
}
