//! Synchronous subject/observer dispatch
//!
//! A [`Subject`] keeps weak handles to its observers: subscribing never
//! extends an observer's lifetime, and handles whose observer was dropped
//! are pruned on the next emission.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Receiver of events emitted by a [`Subject`]
pub trait Observer<E>: Send {
    fn on_event(&mut self, event: &E);
}

/// Ordered set of observers receiving every emitted event.
///
/// Dispatch runs on the caller's thread, in registration order. A panic in
/// one observer aborts delivery to the observers after it.
pub struct Subject<E> {
    observers: Vec<Weak<Mutex<dyn Observer<E>>>>,
}

impl<E> Subject<E> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Subscribe `observer`; registering the same observer twice is a no-op
    pub fn register<O>(&mut self, observer: &Arc<Mutex<O>>)
    where
        O: Observer<E> + 'static,
    {
        let handle: Arc<Mutex<dyn Observer<E>>> = observer.clone();
        let weak = Arc::downgrade(&handle);
        if self
            .observers
            .iter()
            .any(|existing| std::ptr::addr_eq(existing.as_ptr(), weak.as_ptr()))
        {
            return;
        }
        self.observers.push(weak);
    }

    /// Deliver `event` to every live observer
    pub fn emit(&mut self, event: &E) {
        self.observers.retain(|observer| observer.strong_count() > 0);
        for observer in &self.observers {
            if let Some(observer) = observer.upgrade() {
                observer.lock().on_event(event);
            }
        }
    }

    /// Number of observers still alive
    pub fn observer_count(&self) -> usize {
        self.observers
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }
}

impl<E> Default for Subject<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Subject<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observer_count())
            .finish()
    }
}
