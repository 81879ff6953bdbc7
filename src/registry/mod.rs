//! Listener registry: membership, identity and fan-out dispatch.
//!
//! - `core`: the [`Registry`] itself (lock-guarded set, broadcast, drain);
//! - `id`: [`ListenerId`], identity of a listener handle;
//! - `dispatch`: one panic-isolated Tokio task per listener per broadcast;
//! - `inflight`: counter of running dispatches backing `drain()`.

mod core;
mod dispatch;
mod id;
mod inflight;

pub use self::core::Registry;
pub use self::id::ListenerId;
