//! Test host: a bounded packet router that notifies consumers through a
//! [`Registry`], and a metrics consumer that tallies what it was told.
#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use notifier::{Event, Registry};
use parking_lot::Mutex;
use tokio::sync::{self, broadcast, mpsc};

pub const QUEUE_CAPACITY: usize = 10;

/// Routes test output through `tracing`; set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Packet {
    pub txt: u32,
}

/// Capability a router consumer implements.
#[async_trait]
pub trait RouterConsumer: Send + Sync + 'static {
    async fn enqueued(&self, p: Packet);
    async fn forwarded(&self, p: Packet);
    async fn dropped(&self, p: Packet);
}

/// Bounded packet queue that reports what happens to each packet.
pub struct Router {
    tx: mpsc::Sender<Packet>,
    rx: sync::Mutex<mpsc::Receiver<Packet>>,
    consumers: Registry<dyn RouterConsumer>,
}

impl Router {
    pub fn new() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: sync::Mutex::new(rx),
            consumers: Registry::new(),
        }
    }

    pub fn notify(&self, c: Arc<dyn RouterConsumer>) -> bool {
        self.consumers.register(c)
    }

    pub fn stop_notify(&self, c: &Arc<dyn RouterConsumer>) -> bool {
        self.consumers.unregister(c)
    }

    /// Queues `p`, or drops it when the queue is full.
    pub fn receive(&self, p: Packet) {
        match self.tx.try_send(p) {
            Ok(()) => {
                self.consumers
                    .broadcast(move |c| async move { c.enqueued(p).await });
            }
            Err(_) => {
                self.consumers
                    .broadcast(move |c| async move { c.dropped(p).await });
            }
        }
    }

    /// Waits for the oldest queued packet and forwards it.
    pub async fn forward(&self) {
        let next = self.rx.lock().await.recv().await;
        // `tx` lives in `self`, so the queue never closes while we wait.
        if let Some(p) = next {
            self.consumers
                .broadcast(move |c| async move { c.forwarded(p).await });
        }
    }

    pub async fn drain(&self) {
        self.consumers.drain().await;
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.consumers.subscribe_events()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub enqueued: u64,
    pub forwarded: u64,
    pub dropped: u64,
}

/// Consumer that counts notifications and optionally signals each one.
#[derive(Default)]
pub struct Metrics {
    tally: Mutex<Tally>,
    received: Option<mpsc::UnboundedSender<Packet>>,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Metrics that also push every notification into the returned channel.
    pub fn with_signal() -> (Arc<Self>, mpsc::UnboundedReceiver<Packet>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let metrics = Self {
            tally: Mutex::new(Tally::default()),
            received: Some(tx),
        };
        (Arc::new(metrics), rx)
    }

    pub fn tally(&self) -> Tally {
        *self.tally.lock()
    }

    fn signal(&self, p: Packet) {
        if let Some(tx) = &self.received {
            let _ = tx.send(p);
        }
    }
}

#[async_trait]
impl RouterConsumer for Metrics {
    async fn enqueued(&self, p: Packet) {
        self.tally.lock().enqueued += 1;
        self.signal(p);
    }

    async fn forwarded(&self, _p: Packet) {
        self.tally.lock().forwarded += 1;
        self.signal(Packet::default());
    }

    async fn dropped(&self, _p: Packet) {
        self.tally.lock().dropped += 1;
        self.signal(Packet::default());
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.tally();
        write!(
            f,
            "{} enqueued | {} forwarded | {} queued | {} dropped",
            t.enqueued,
            t.forwarded,
            t.enqueued as i64 - t.forwarded as i64,
            t.dropped
        )
    }
}

/// Consumer that panics whenever a packet is dropped.
pub struct Faulty;

#[async_trait]
impl RouterConsumer for Faulty {
    async fn enqueued(&self, _p: Packet) {}

    async fn forwarded(&self, _p: Packet) {}

    async fn dropped(&self, p: Packet) {
        panic!("faulty consumer cannot handle drop of packet {}", p.txt);
    }
}
