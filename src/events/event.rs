//! # Diagnostic events emitted by the registry.
//!
//! The [`EventKind`] enum classifies what happened:
//! - **Membership events**: a listener joined or left the set
//! - **Fault events**: a dispatch panicked and was isolated
//!
//! The [`Event`] struct carries the metadata: timestamp, sequence number,
//! listener identity and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use notifier::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::DispatchPanicked).with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::DispatchPanicked);
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! assert!(ev.listener.is_none());
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::registry::ListenerId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of registry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Membership events ===
    /// A listener was added to the set.
    ///
    /// Sets:
    /// - `listener`: identity of the new member
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ListenerRegistered,

    /// A listener was removed from the set.
    ///
    /// Sets:
    /// - `listener`: identity of the removed member
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ListenerUnregistered,

    // === Fault events ===
    /// A dispatch panicked; the panic was caught inside its task.
    ///
    /// Sets:
    /// - `listener`: identity of the listener the dispatch targeted
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    DispatchPanicked,
}

/// Registry event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Listener the event refers to, if applicable.
    pub listener: Option<ListenerId>,
    /// Human-readable reason (panic message, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            listener: None,
            reason: None,
        }
    }

    /// Attaches a listener identity.
    #[inline]
    pub fn with_listener(mut self, id: ListenerId) -> Self {
        self.listener = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a dispatch panic event.
    #[inline]
    pub fn dispatch_panicked(id: ListenerId, info: String) -> Self {
        Event::new(EventKind::DispatchPanicked)
            .with_listener(id)
            .with_reason(info)
    }

    #[inline]
    pub fn is_dispatch_panic(&self) -> bool {
        matches!(self.kind, EventKind::DispatchPanicked)
    }
}
