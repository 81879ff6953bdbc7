//! # Listener registry with concurrent fan-out.
//!
//! [`Registry`] keeps an identity-keyed set of listeners behind one mutex and
//! broadcasts a dispatch closure to every member as independent Tokio tasks.
//!
//! ## Architecture
//! ```text
//! register(L) ─────┐
//! unregister(L) ───┼──► Mutex<Option<HashMap<ListenerId, Arc<L>>>>
//! broadcast(f) ────┘            │ (lock held only while spawning)
//!                               ├──► task 1 ──► f(listener1)
//!                               ├──► task 2 ──► f(listener2)
//!                               └──► task N ──► f(listenerN)
//!                                       └────► panic → DispatchPanicked
//! ```
//!
//! ## Rules
//! - **Identity**: a listener is an `Arc<L>`; clones of the same `Arc` are the same listener
//! - **Snapshot**: a broadcast delivers to the members present when it takes the lock
//! - **No cross-listener ordering**: listener A may see broadcast N+1 before B sees N
//! - **Non-blocking**: `broadcast()` returns once every dispatch is spawned
//! - **Isolation**: a slow or panicking listener doesn't affect the others
//! - **Re-entrant**: dispatches may call back into the registry

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast;

use super::dispatch::Dispatch;
use super::id::ListenerId;
use super::inflight::Inflight;
use crate::config::Config;
use crate::error::RegistryError;
use crate::events::{Bus, Event, EventKind};

/// Thread-safe set of listeners with fire-and-forget broadcast.
///
/// `L` is the capability listeners implement, typically a trait object:
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use notifier::Registry;
///
/// trait Ping: Send + Sync {
///     fn ping(&self, n: u32);
/// }
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl Ping for Counter {
///     fn ping(&self, _n: u32) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let registry: Registry<dyn Ping> = Registry::new();
///     let counter = Arc::new(Counter::default());
///     registry.register(counter.clone());
///
///     registry.broadcast(|l| async move { l.ping(7) });
///     registry.drain().await;
///
///     assert_eq!(counter.0.load(Ordering::SeqCst), 1);
/// }
/// ```
pub struct Registry<L: ?Sized> {
    listeners: Mutex<Option<HashMap<ListenerId, Arc<L>>>>,
    inflight: Inflight,
    bus: Bus,
    runtime: Option<Handle>,
    config: Config,
}

impl<L: ?Sized> Registry<L> {
    /// Creates an empty registry with [`Config::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty registry with the given configuration.
    ///
    /// When called inside a Tokio runtime, dispatches are pinned to that
    /// runtime, so `broadcast()` works from any thread afterwards.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            listeners: Mutex::new(None),
            inflight: Inflight::new(),
            bus: Bus::new(config.bus_capacity_clamped()),
            runtime: Handle::try_current().ok(),
            config,
        }
    }

    /// Pins dispatches to `runtime`, replacing the one captured at construction.
    ///
    /// Without a pinned runtime, `broadcast()` spawns onto the runtime of the
    /// calling context. Pin one when the registry is built outside a runtime
    /// and broadcast from plain threads.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().as_ref().map_or(0, HashMap::len)
    }

    /// Returns true if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `listener` is currently registered.
    pub fn contains(&self, listener: &Arc<L>) -> bool {
        let id = ListenerId::of(listener);
        self.listeners
            .lock()
            .as_ref()
            .is_some_and(|set| set.contains_key(&id))
    }

    /// Number of dispatches scheduled and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.inflight.count()
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates a receiver for membership and fault events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Adds `listener` to the set.
    ///
    /// Idempotent: registering a listener that is already a member changes
    /// nothing. Returns `true` if the listener was newly added.
    ///
    /// Any broadcast that begins after this call returns includes the listener.
    pub fn register(&self, listener: Arc<L>) -> bool {
        let id = ListenerId::of(&listener);
        let added = {
            let mut guard = self.listeners.lock();
            let set = guard.get_or_insert_with(HashMap::new);
            if set.contains_key(&id) {
                false
            } else {
                set.insert(id, listener);
                true
            }
        };

        if added {
            tracing::debug!(listener = %id, "listener registered");
            self.bus
                .publish(Event::new(EventKind::ListenerRegistered).with_listener(id));
        }
        added
    }

    /// Removes `listener` from the set.
    ///
    /// A no-op when the listener is absent. Returns `true` if it was removed.
    ///
    /// Once this returns, no broadcast that begins afterwards delivers to the
    /// listener. Dispatches already scheduled are not cancelled.
    pub fn unregister(&self, listener: &Arc<L>) -> bool {
        self.unregister_id(ListenerId::of(listener))
    }

    /// Removes the listener with identity `id`, see [`unregister`](Self::unregister).
    pub fn unregister_id(&self, id: ListenerId) -> bool {
        // Drop the removed handle after releasing the lock: its destructor is listener code.
        let removed = {
            let mut guard = self.listeners.lock();
            guard.as_mut().and_then(|set| set.remove(&id))
        };

        match removed {
            Some(_listener) => {
                tracing::debug!(listener = %id, "listener unregistered");
                self.bus
                    .publish(Event::new(EventKind::ListenerUnregistered).with_listener(id));
                true
            }
            None => false,
        }
    }

    /// Resolves once every dispatch scheduled so far has finished.
    ///
    /// Dispatches scheduled while waiting are waited for as well.
    pub async fn drain(&self) {
        self.inflight.wait_idle().await;
    }

    /// Like [`drain`](Self::drain) but gives up after `grace`.
    ///
    /// A zero `grace` does not wait and needs no timer; it only checks whether
    /// anything is still running.
    ///
    /// # Errors
    /// [`RegistryError::DrainTimeout`] if dispatches are still running after `grace`.
    ///
    /// # Panics
    /// With a non-zero `grace`, panics if the current runtime was built
    /// without the time driver (`enable_time`).
    pub async fn drain_timeout(&self, grace: Duration) -> Result<(), RegistryError> {
        if grace.is_zero() {
            return match self.in_flight() {
                0 => Ok(()),
                pending => Err(RegistryError::DrainTimeout { grace, pending }),
            };
        }

        match tokio::time::timeout(grace, self.drain()).await {
            Ok(()) => Ok(()),
            Err(_elapsed) => Err(RegistryError::DrainTimeout {
                grace,
                pending: self.in_flight(),
            }),
        }
    }

    /// Waits for in-flight dispatches using [`Config::grace`].
    ///
    /// A zero grace does not wait; it fails immediately if anything is still running.
    ///
    /// # Errors
    /// [`RegistryError::DrainTimeout`] if dispatches outlive the grace period.
    ///
    /// # Panics
    /// With a non-zero grace, panics if the current runtime was built without
    /// the time driver (`enable_time`).
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        let grace = self.config.shutdown_grace().unwrap_or(Duration::ZERO);
        let result = self.drain_timeout(grace).await;

        if let Err(err) = &result {
            tracing::warn!(error = err.as_label(), "{}", err.as_message());
        }
        result
    }
}

impl<L: ?Sized + Send + Sync + 'static> Registry<L> {
    /// Schedules `dispatch(listener)` for every registered listener.
    ///
    /// Each call runs in its own Tokio task; none runs on the caller's stack and
    /// none waits for another. The lock is released as soon as every task is
    /// spawned. Returns the number of dispatches scheduled.
    ///
    /// A panic inside a dispatch is caught, logged and published as
    /// [`EventKind::DispatchPanicked`]; it never reaches the caller.
    ///
    /// Dispatches go to the runtime captured at construction or set with
    /// [`with_runtime`](Self::with_runtime). A registry built outside any
    /// runtime falls back to the caller's runtime; with neither, nothing is
    /// scheduled, an error is logged and `0` is returned.
    pub fn broadcast<F, Fut>(&self, dispatch: F) -> usize
    where
        F: Fn(Arc<L>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let guard = self.listeners.lock();
        let Some(set) = guard.as_ref().filter(|set| !set.is_empty()) else {
            return 0;
        };

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            tracing::error!(
                fanout = set.len(),
                "broadcast outside a Tokio runtime; no dispatch scheduled"
            );
            return 0;
        };

        let dispatch = Arc::new(dispatch);
        for (&id, listener) in set {
            Dispatch {
                id,
                listener: Arc::clone(listener),
                dispatch: Arc::clone(&dispatch),
                guard: self.inflight.enter(),
                bus: self.bus.clone(),
            }
            .spawn(&runtime);
        }

        let fanout = set.len();
        drop(guard);

        tracing::trace!(fanout, "broadcast scheduled");
        fanout
    }
}

impl<L: ?Sized> Default for Registry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for Registry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("listeners", &self.len())
            .field("in_flight", &self.in_flight())
            .field("config", &self.config)
            .finish()
    }
}
