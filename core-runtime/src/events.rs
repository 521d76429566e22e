//! # Event Emitter
//!
//! A small observer abstraction: a map from event name to the ordered list of
//! callbacks registered for it.
//!
//! ## Overview
//!
//! - [`EventEmitter::on`] registers a callback that fires on every emission
//! - [`EventEmitter::once`] registers a callback that removes itself before
//!   its first invocation
//! - [`EventEmitter::emit`] calls the callbacks registered for a name, in
//!   registration order
//!
//! Closures cannot be compared, so every registration returns a
//! [`ListenerId`] that is later passed to [`EventEmitter::remove_listener`].
//!
//! Callbacks run synchronously on the emitting thread. The listener list is
//! snapshotted before dispatch and no lock is held while callbacks run, so a
//! callback may register or remove listeners (including itself).
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::EventEmitter;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let emitter: EventEmitter<&'static str, u32> = EventEmitter::new();
//! let total = Arc::new(AtomicUsize::new(0));
//!
//! let sink = Arc::clone(&total);
//! emitter.once("score", move |value| {
//!     sink.fetch_add(*value as usize, Ordering::SeqCst);
//! });
//!
//! assert!(emitter.emit(&"score", &5));
//! assert!(!emitter.emit(&"score", &7));
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Handle identifying one registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct Listener<P> {
    id: ListenerId,
    callback: Callback<P>,
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

struct Registry<K, P> {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<K, Vec<Listener<P>>>>,
}

impl<K, P> Registry<K, P>
where
    K: Eq + Hash,
{
    fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut removed = false;
        listeners.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|listener| listener.id != id);
            removed |= entries.len() != before;
            !entries.is_empty()
        });
        removed
    }
}

/// Name-keyed observer registry.
///
/// Cloning yields another handle to the same registry.
pub struct EventEmitter<K, P> {
    registry: Arc<Registry<K, P>>,
}

impl<K, P> Clone for EventEmitter<K, P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<K, P> Default for EventEmitter<K, P>
where
    K: Eq + Hash + Clone + Send + 'static,
    P: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> EventEmitter<K, P>
where
    K: Eq + Hash + Clone + Send + 'static,
    P: 'static,
{
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                listeners: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register `callback` to run on every emission of `event`.
    pub fn on<F>(&self, event: K, callback: F) -> ListenerId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.register(event, Arc::new(callback))
    }

    /// Register `callback` to run on the next emission of `event` only.
    ///
    /// The listener is removed before the callback is invoked, so a callback
    /// that emits the same event again does not see itself.
    pub fn once<F>(&self, event: K, callback: F) -> ListenerId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let id = self.next_id();
        let registry: Weak<Registry<K, P>> = Arc::downgrade(&self.registry);
        let fired = AtomicBool::new(false);

        let wrapper = move |payload: &P| {
            if fired.swap(true, Ordering::SeqCst) {
                return;
            }
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
            callback(payload);
        };

        self.insert(
            event,
            Listener {
                id,
                callback: Arc::new(wrapper),
            },
        );
        id
    }

    /// Invoke every callback registered for `event`.
    ///
    /// Returns whether any listener was registered at the time of the call.
    pub fn emit(&self, event: &K, payload: &P) -> bool {
        let snapshot: Vec<Listener<P>> = {
            let listeners = self
                .registry
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match listeners.get(event) {
                Some(entries) => entries.clone(),
                None => return false,
            }
        };

        for listener in &snapshot {
            (listener.callback)(payload);
        }
        !snapshot.is_empty()
    }

    /// Remove one listener. Returns `false` if it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.registry.remove(id)
    }

    /// Remove every listener for `event`, or every listener at all with `None`.
    pub fn remove_all_listeners(&self, event: Option<&K>) {
        let mut listeners = self
            .registry
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match event {
            Some(event) => {
                listeners.remove(event);
            }
            None => listeners.clear(),
        }
    }

    pub fn listener_count(&self, event: &K) -> usize {
        self.registry
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }

    fn register(&self, event: K, callback: Callback<P>) -> ListenerId {
        let id = self.next_id();
        self.insert(event, Listener { id, callback });
        id
    }

    fn insert(&self, event: K, listener: Listener<P>) {
        self.registry
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event)
            .or_default()
            .push(listener);
    }

    fn next_id(&self) -> ListenerId {
        ListenerId(self.registry.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl<K, P> fmt::Debug for EventEmitter<K, P>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self
            .registry
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let counts: Vec<(&K, usize)> = listeners.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("EventEmitter")
            .field("listeners", &counts)
            .finish()
    }
}
