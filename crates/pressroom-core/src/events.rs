//! Typed progress events and a small synchronous publish/subscribe bus.
//!
//! Events are delivered synchronously, in registration order, on the
//! emitting thread. `subscribe` hands back a [`Subscription`] used to
//! unsubscribe; dropping the handle without cancelling leaves the listener
//! registered.

use std::sync::{Arc, Mutex, Weak};

use serde::Serialize;

/// Everything the engine reports to the UI layer. A closed union - no
/// string-typed event names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ProgressEvent {
    LoadStart {
        total_pages: u32,
    },
    LoadProgress {
        progress: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        page_number: Option<u32>,
    },
    LoadComplete {
        total_pages: u32,
    },
    LoadError {
        error: String,
    },
    ExportStart,
    ExportProgress {
        progress: f32,
    },
    ExportComplete,
    ExportError {
        error: String,
    },
    RenderStart {
        page_number: u32,
    },
    RenderProgress {
        page_number: u32,
        progress: f32,
    },
    RenderComplete {
        page_number: u32,
    },
}

type Listener = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Synchronous, ordered pub/sub for [`ProgressEvent`]s.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

/// Handle returned by [`EventBus::subscribe`]; call [`Subscription::cancel`]
/// to unsubscribe.
pub struct Subscription {
    id: u64,
    bus: Weak<Mutex<BusInner>>,
}

impl Subscription {
    pub fn cancel(self) {
        if let Some(bus) = self.bus.upgrade() {
            let mut inner = lock(&bus);
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&ProgressEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every listener, in registration order. Listeners
    /// run outside the bus lock so they may subscribe or emit re-entrantly.
    pub fn emit(&self, event: &ProgressEvent) {
        let listeners: Vec<Listener> = {
            let inner = lock(&self.inner);
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

fn lock(inner: &Mutex<BusInner>) -> std::sync::MutexGuard<'_, BusInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
