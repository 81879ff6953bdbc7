//! # Per-listener dispatch task.
//!
//! Every dispatch scheduled by [`Registry::broadcast`](crate::Registry::broadcast)
//! runs as its own Tokio task behind a fault boundary:
//!
//! ```text
//! spawn ──► catch_unwind( dispatch(listener).await )
//!              ├─ Ok            ──► done
//!              └─ Err(payload)  ──► tracing::error! + Bus(DispatchPanicked)
//!           drop(InflightGuard)  ──► in-flight count -= 1
//! ```
//!
//! The closure call itself happens inside the boundary, so a panic raised while
//! building the future is caught the same way as one raised while polling it.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a listener uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;

use super::id::ListenerId;
use super::inflight::InflightGuard;
use crate::events::{Bus, Event};

/// Everything one dispatch task needs, moved into the task.
pub(crate) struct Dispatch<L: ?Sized, F> {
    pub(crate) id: ListenerId,
    pub(crate) listener: Arc<L>,
    pub(crate) dispatch: Arc<F>,
    pub(crate) guard: InflightGuard,
    pub(crate) bus: Bus,
}

impl<L, F, Fut> Dispatch<L, F>
where
    L: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<L>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    /// Spawns the dispatch on `runtime` without waiting for it.
    pub(crate) fn spawn(self, runtime: &Handle) {
        let Dispatch {
            id,
            listener,
            dispatch,
            guard,
            bus,
        } = self;

        runtime.spawn(async move {
            let _guard = guard;
            let fut = async move { (*dispatch)(listener).await };

            if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                let info = panic_message(&*panic_err);
                tracing::error!(listener = %id, panic = %info, "listener dispatch panicked");
                bus.publish(Event::dispatch_panicked(id, info));
            }
        });
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
