//! Registry events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Registry::register`, `Registry::unregister`, dispatch tasks (panics).
//! - **Consumers**: anything holding a receiver from `Registry::subscribe_events()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
