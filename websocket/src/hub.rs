//! Fan-out hub for live traffic observers.
//!
//! Each observer gets its own bounded event queue; `broadcast` pushes a
//! serialized event onto every live queue without awaiting any of them, so
//! one stalled client can never hold up call ingestion. An observer whose
//! queue is full or whose receiving side is gone is dropped from the live
//! set on the spot.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::events::TrafficEvent;

/// Default per-observer event queue depth.
pub const DEFAULT_OBSERVER_BUFFER: usize = 256;

/// Identifier handed out to each observer connection. Never reused within
/// the lifetime of a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Raw numeric value, mostly useful in logs.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// Lifecycle of a single observer connection.
///
/// `Disconnected` is terminal; a client that reconnects gets a fresh
/// handle with a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Connecting,
    Connected,
    Disconnected,
}

impl ObserverState {
    /// Whether events should still be delivered to this observer.
    fn is_live(self) -> bool {
        matches!(self, ObserverState::Connected)
    }
}

/// A registered observer: its lifecycle state plus the sending half of its
/// event queue. The receiving half lives with the connection task.
struct Observer {
    state: ObserverState,
    sender: mpsc::Sender<String>,
}

impl Observer {
    fn new(sender: mpsc::Sender<String>) -> Self {
        Self {
            state: ObserverState::Connecting,
            sender,
        }
    }
}

/// Registry of live traffic observers.
///
/// All mutation of the live set goes through the internal mutex, so
/// `connect`, `disconnect`, and `broadcast` may race freely across tasks.
pub struct TrafficHub {
    observers: Mutex<HashMap<ObserverId, Observer>>,
    next_id: AtomicU64,
    buffer: usize,
}

impl TrafficHub {
    /// Create a hub whose observers each get a queue of `buffer` events.
    pub fn new(buffer: usize) -> Self {
        Self {
            observers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
        }
    }

    /// Register a new observer and return its id together with the
    /// receiving end of its event queue.
    pub async fn connect(&self) -> (ObserverId, mpsc::Receiver<String>) {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.buffer);

        let mut observer = Observer::new(sender);
        observer.state = ObserverState::Connected;

        let mut observers = self.observers.lock().await;
        observers.insert(id, observer);
        debug!(%id, live = observers.len(), "traffic observer connected");
        (id, receiver)
    }

    /// Remove an observer from the live set. Returns `false` if it was
    /// already gone; duplicate disconnects are expected when both the read
    /// loop and an explicit close race to clean up.
    pub async fn disconnect(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.lock().await;
        match observers.remove(&id) {
            Some(mut observer) => {
                observer.state = ObserverState::Disconnected;
                debug!(%id, live = observers.len(), "traffic observer disconnected");
                true
            }
            None => false,
        }
    }

    /// Push `event` onto every live observer's queue and return how many
    /// observers it was queued for.
    ///
    /// The event is serialized once and delivered without blocking. An
    /// observer that cannot take the event, because its queue is full or
    /// its receiver is gone, is marked `Disconnected` and pruned; per
    /// observer, everything already queued stays in broadcast order.
    pub async fn broadcast(&self, event: &TrafficEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize traffic event, nothing broadcast");
                return 0;
            }
        };

        let mut observers = self.observers.lock().await;
        let mut delivered = 0;
        for (id, observer) in observers.iter_mut() {
            if !observer.state.is_live() {
                continue;
            }
            match observer.sender.try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(%id, "observer queue full, dropping observer");
                    observer.state = ObserverState::Disconnected;
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(%id, "observer receiver gone, pruning");
                    observer.state = ObserverState::Disconnected;
                }
            }
        }
        observers.retain(|_, observer| observer.state.is_live());
        delivered
    }

    /// Number of observers currently in the live set.
    pub async fn observer_count(&self) -> usize {
        self.observers.lock().await.len()
    }
}

impl Default for TrafficHub {
    fn default() -> Self {
        Self::new(DEFAULT_OBSERVER_BUFFER)
    }
}
