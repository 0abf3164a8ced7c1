//! In-memory reference event store over a shared list of
//! `(originator_id, record)` pairs.
//!
//! No indexing: reads filter the whole list. Intended for tests and
//! single-process use.

use std::sync::{Arc, Mutex, MutexGuard};

use eventsourcer_core::error::DomainError;
use eventsourcer_core::event::Event;
use eventsourcer_core::store::{
    Decoder, Encoder, EventStore, Originated, Reader, Transcoder, Writer,
};
use tracing::trace;
use uuid::Uuid;

/// The list shared by a [`ListReader`] and a [`ListWriter`].
#[derive(Debug)]
pub struct EventList<S> {
    records: Arc<Mutex<Vec<(Uuid, S)>>>,
}

impl<S> EventList<S> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of stored records across all originators.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreIo` if the list lock is poisoned.
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.len())
    }

    /// Returns `true` if nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreIo` if the list lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<(Uuid, S)>>, DomainError> {
        self.records
            .lock()
            .map_err(|_| DomainError::StoreIo("event list lock poisoned".into()))
    }
}

impl<S: Clone> EventList<S> {
    /// Snapshot of every stored pair, in append order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreIo` if the list lock is poisoned.
    pub fn records(&self) -> Result<Vec<(Uuid, S)>, DomainError> {
        Ok(self.lock()?.clone())
    }
}

impl<S> Clone for EventList<S> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<S> Default for EventList<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads records of one originator, preserving insertion order.
#[derive(Debug)]
pub struct ListReader<S> {
    list: EventList<S>,
}

impl<S> ListReader<S> {
    /// Creates a reader over `list`.
    #[must_use]
    pub fn new(list: EventList<S>) -> Self {
        Self { list }
    }
}

impl<S: Clone + Send> Reader<S> for ListReader<S> {
    fn read(&self, originator_id: Uuid) -> Result<Vec<S>, DomainError> {
        let records: Vec<S> = self
            .list
            .lock()?
            .iter()
            .filter(|(id, _)| *id == originator_id)
            .map(|(_, record)| record.clone())
            .collect();
        trace!(%originator_id, record_count = records.len(), "read event list");
        Ok(records)
    }
}

/// Appends records to the tail, tagging each with its originator id.
#[derive(Debug)]
pub struct ListWriter<S> {
    list: EventList<S>,
}

impl<S> ListWriter<S> {
    /// Creates a writer over `list`.
    #[must_use]
    pub fn new(list: EventList<S>) -> Self {
        Self { list }
    }
}

impl<S: Originated + Send> Writer<S> for ListWriter<S> {
    fn write(&self, records: Vec<S>) -> Result<(), DomainError> {
        let record_count = records.len();
        self.list.lock()?.extend(
            records
                .into_iter()
                .map(|record| (record.originator_id(), record)),
        );
        trace!(record_count, "appended to event list");
        Ok(())
    }
}

/// Stores events as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranscoder;

impl Encoder<Event> for IdentityTranscoder {
    fn encode(&self, event: &Event) -> Result<Event, DomainError> {
        Ok(event.clone())
    }
}

impl Decoder<Event> for IdentityTranscoder {
    fn decode(&self, stored: Event) -> Result<Event, DomainError> {
        Ok(stored)
    }
}

/// Factory for list-backed event stores.
#[derive(Debug)]
pub struct ListEventStore;

impl ListEventStore {
    /// Builds a store keeping events un-encoded in a fresh list.
    #[must_use]
    pub fn build() -> EventStore<Event> {
        Self::build_on(EventList::new(), IdentityTranscoder)
    }

    /// Builds a store over `list`, encoding events with `transcoder`.
    ///
    /// Keep a clone of `list` to inspect what the store wrote.
    #[must_use]
    pub fn build_on<S, T>(list: EventList<S>, transcoder: T) -> EventStore<S>
    where
        S: Originated + Clone + Send + 'static,
        T: Transcoder<S> + 'static,
    {
        let transcoder = Arc::new(transcoder);
        EventStore::new(
            transcoder.clone(),
            transcoder,
            Arc::new(ListReader::new(list.clone())),
            Arc::new(ListWriter::new(list)),
        )
    }
}
