//! # notifier
//!
//! **notifier** is a thread-safe observer registry for Rust.
//!
//! Listeners register interest in an event source, and the source broadcasts
//! notifications to all of them concurrently. Each delivery runs as its own
//! Tokio task, so a slow or panicking listener never blocks the notifier or
//! its siblings. Listeners may be added or removed at any time, including from
//! inside a delivery.
//!
//! ## Architecture
//! ```text
//!   event source (host)
//!     │  register(Arc<L>) / unregister(&Arc<L>)
//!     │  broadcast(|l| async move { l.on_something(..) })
//!     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry<L>                                                      │
//! │  - Mutex<Option<HashMap<ListenerId, Arc<L>>>> (identity-keyed)    │
//! │  - Inflight counter (drain / shutdown)                            │
//! │  - Bus (ListenerRegistered / ListenerUnregistered / Panicked)     │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ tokio task 1 │   │ tokio task 2 │   │ tokio task N │
//!     │ catch_unwind │   │ catch_unwind │   │ catch_unwind │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//!        listener 1         listener 2         listener N
//! ```
//!
//! ## Guarantees
//! | Property          | Description                                                       |
//! |-------------------|-------------------------------------------------------------------|
//! | **Membership**    | No duplicates, no lost updates under concurrent register/unregister |
//! | **Snapshot**      | A broadcast delivers to the members present when it starts        |
//! | **Unregister**    | No broadcast started after `unregister` returns reaches the listener |
//! | **Non-blocking**  | `broadcast()` only spawns; it never waits for a listener          |
//! | **Isolation**     | Panics are caught per dispatch, logged and published on the bus   |
//! | **Drain**         | `drain()` / `drain_timeout()` / `shutdown()` wait for in-flight work |
//!
//! Delivery is fire-and-forget: no ordering between listeners, no retry, no
//! backpressure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use notifier::Registry;
//!
//! trait TemperatureListener: Send + Sync {
//!     fn changed(&self, celsius: f64);
//! }
//!
//! #[derive(Default)]
//! struct Readings(AtomicU64);
//!
//! impl TemperatureListener for Readings {
//!     fn changed(&self, _celsius: f64) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry: Registry<dyn TemperatureListener> = Registry::new();
//!     let readings = Arc::new(Readings::default());
//!     registry.register(readings.clone());
//!
//!     for t in [20.5, 21.0, 21.5] {
//!         registry.broadcast(move |l| async move { l.changed(t) });
//!     }
//!     registry.shutdown().await?;
//!
//!     assert_eq!(readings.0.load(Ordering::Relaxed), 3);
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod registry;

// ---- Public re-exports ----

pub use config::Config;
pub use error::RegistryError;
pub use events::{Bus, Event, EventKind};
pub use registry::{ListenerId, Registry};
