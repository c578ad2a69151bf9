//! Registry of [`SessionListener`]s

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::ports::SessionListener;

/// Listeners notified by the refresh coordinator
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(u64, Arc<dyn SessionListener>)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. It stays registered until the returned handle is
    /// deregistered or dropped.
    pub fn register(self: &Arc<Self>, listener: Arc<dyn SessionListener>) -> ListenerRegistration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().push((id, listener));

        ListenerRegistration { registry: Arc::downgrade(self), id, active: AtomicBool::new(true) }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    pub fn notify_sign_out(&self) {
        for listener in self.snapshot() {
            listener.on_sign_out();
        }
    }

    pub fn notify_token_refreshed(&self, token: &str) {
        for listener in self.snapshot() {
            listener.on_token_refreshed(token);
        }
    }

    // Callbacks run without the lock held so a listener may deregister
    // itself from inside one.
    fn snapshot(&self) -> Vec<Arc<dyn SessionListener>> {
        self.listeners.read().iter().map(|(_, listener)| Arc::clone(listener)).collect()
    }

    fn remove(&self, id: u64) {
        self.listeners.write().retain(|(existing, _)| *existing != id);
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry").field("listeners", &self.len()).finish()
    }
}

/// Handle returned by [`ListenerRegistry::register`]
#[derive(Debug)]
pub struct ListenerRegistration {
    registry: Weak<ListenerRegistry>,
    id: u64,
    active: AtomicBool,
}

impl ListenerRegistration {
    /// Remove the listener. Calling this more than once is a no-op.
    pub fn deregister(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.deregister();
    }
}
