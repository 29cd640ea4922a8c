//! Single-slot notification for rejected session tokens.
//!
//! At most one listener is registered at a time. Registering replaces the
//! previous listener, whose receiver then observes a closed channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;

/// Emitted when the server answers 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnauthorizedEvent {
    /// HTTP status (always 401).
    pub status: u16,
    /// Request path as passed to the client.
    pub path: String,
    /// Normalized error message.
    pub message: String,
}

struct Slot {
    id: u64,
    tx: mpsc::UnboundedSender<UnauthorizedEvent>,
}

/// Registration slot shared by clones of one client.
#[derive(Clone, Default)]
pub struct UnauthorizedNotifier {
    slot: Arc<Mutex<Option<Slot>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for UnauthorizedNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnauthorizedNotifier")
            .field("listening", &self.has_listener())
            .finish()
    }
}

impl UnauthorizedNotifier {
    /// Creates a notifier with no listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener, replacing any existing one.
    pub fn register(&self) -> UnauthorizedListener {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Slot { id, tx });
        if let Some(previous) = previous {
            debug!(replaced = previous.id, id, "Unauthorized listener replaced");
        }
        UnauthorizedListener { id, rx }
    }

    /// Removes whatever listener is registered.
    pub fn clear(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Removes the listener only if it is still the one identified by `id`.
    pub fn deregister(&self, id: u64) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|s| s.id == id) {
            *slot = None;
        }
    }

    /// True while a live listener is registered.
    pub fn has_listener(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|s| !s.tx.is_closed())
    }

    /// Delivers `event` without blocking. Returns whether a listener received it.
    pub fn notify(&self, event: UnauthorizedEvent) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(current) = slot.as_ref() else {
            debug!(path = %event.path, "401 with no listener registered");
            return false;
        };
        if current.tx.send(event).is_ok() {
            true
        } else {
            debug!(id = current.id, "Unauthorized listener dropped, clearing slot");
            *slot = None;
            false
        }
    }
}

/// Receiving half handed to the registered listener.
#[derive(Debug)]
pub struct UnauthorizedListener {
    id: u64,
    rx: mpsc::UnboundedReceiver<UnauthorizedEvent>,
}

impl UnauthorizedListener {
    /// Registration id, used with [`UnauthorizedNotifier::deregister`].
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the next event. `None` once replaced or cleared.
    pub async fn recv(&mut self) -> Option<UnauthorizedEvent> {
        self.rx.recv().await
    }

    /// Returns a pending event without waiting.
    pub fn try_recv(&mut self) -> Option<UnauthorizedEvent> {
        self.rx.try_recv().ok()
    }
}
