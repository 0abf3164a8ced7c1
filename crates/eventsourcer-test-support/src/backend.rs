//! Test backends — mock `Reader`/`Writer`/`Encoder` implementations for tests.

use std::sync::Mutex;

use eventsourcer_core::error::DomainError;
use eventsourcer_core::event::Event;
use eventsourcer_core::store::{Encoder, Reader, Writer};
use uuid::Uuid;

/// A backend that records every `read` and `write` call. Returns the
/// configured records from every `read` and always succeeds on `write`.
#[derive(Debug)]
pub struct RecordingBackend<S> {
    read_result: Vec<S>,
    reads: Mutex<Vec<Uuid>>,
    writes: Mutex<Vec<Vec<S>>>,
}

impl<S: Clone> RecordingBackend<S> {
    /// Create a backend that returns `read_result` from every `read` call.
    #[must_use]
    pub fn new(read_result: Vec<S>) -> Self {
        Self {
            read_result,
            reads: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Returns the originator ids passed to `read`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reads(&self) -> Vec<Uuid> {
        self.reads.lock().unwrap().clone()
    }

    /// Returns the record batches passed to `write`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<Vec<S>> {
        self.writes.lock().unwrap().clone()
    }
}

impl<S: Clone + Send + Sync> Reader<S> for RecordingBackend<S> {
    fn read(&self, originator_id: Uuid) -> Result<Vec<S>, DomainError> {
        self.reads.lock().unwrap().push(originator_id);
        Ok(self.read_result.clone())
    }
}

impl<S: Clone + Send + Sync> Writer<S> for RecordingBackend<S> {
    fn write(&self, records: Vec<S>) -> Result<(), DomainError> {
        self.writes.lock().unwrap().push(records);
        Ok(())
    }
}

/// A backend whose reads and writes always fail with a store I/O error.
/// Useful for testing error-propagation paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingBackend;

impl<S> Reader<S> for FailingBackend {
    fn read(&self, _originator_id: Uuid) -> Result<Vec<S>, DomainError> {
        Err(DomainError::StoreIo("connection refused".into()))
    }
}

impl<S> Writer<S> for FailingBackend {
    fn write(&self, _records: Vec<S>) -> Result<(), DomainError> {
        Err(DomainError::StoreIo("connection refused".into()))
    }
}

/// An identity encoder that refuses events with one particular name.
#[derive(Debug, Clone, Copy)]
pub struct FailingEncoder {
    /// Event name that fails to encode.
    pub poison: &'static str,
}

impl Encoder<Event> for FailingEncoder {
    fn encode(&self, event: &Event) -> Result<Event, DomainError> {
        if event.name() == self.poison {
            return Err(DomainError::Encoding(format!(
                "cannot encode event {}",
                event.name()
            )));
        }
        Ok(event.clone())
    }
}
