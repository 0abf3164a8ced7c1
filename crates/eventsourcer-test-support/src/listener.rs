//! Test listener — records every event an emitter notifies.

use std::sync::Mutex;

use eventsourcer_core::command::EventListener;
use eventsourcer_core::event::Event;

/// An `EventListener` that keeps a copy of each notified event.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    /// Create an empty listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notified events, in notification order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl<A> EventListener<A> for RecordingListener {
    fn notify(&self, _aggregate: &A, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}
