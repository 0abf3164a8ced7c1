//! Event store abstraction.
//!
//! An [`EventStore`] composes a transcoder (an [`Encoder`]/[`Decoder`] pair)
//! with a storage backend (a [`Reader`]/[`Writer`] pair), all keyed to the
//! same stored representation `S`. Aggregates only ever see [`Event`]s; what
//! `S` looks like is up to the backend.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;
use crate::event::Event;

/// Anything that knows which aggregate it belongs to.
pub trait Originated {
    /// The owning aggregate's identifier.
    fn originator_id(&self) -> Uuid;
}

impl Originated for Event {
    fn originator_id(&self) -> Uuid {
        Event::originator_id(self)
    }
}

/// Converts an in-memory event into its stored representation.
pub trait Encoder<S>: Send + Sync {
    /// Encodes one event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Encoding` if the event cannot be represented.
    fn encode(&self, event: &Event) -> Result<S, DomainError>;
}

/// Converts a stored representation back into an in-memory event.
pub trait Decoder<S>: Send + Sync {
    /// Decodes one stored record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Decoding` if the record is malformed.
    fn decode(&self, stored: S) -> Result<Event, DomainError>;
}

/// A matched encoder/decoder pair. `decode(encode(e))` must equal `e`.
pub trait Transcoder<S>: Encoder<S> + Decoder<S> {}

impl<S, T> Transcoder<S> for T where T: Encoder<S> + Decoder<S> {}

/// Fetches stored records of one aggregate.
pub trait Reader<S>: Send + Sync {
    /// Returns every record of `originator_id`, in append order. An unknown id
    /// yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreIo` if the backend fails.
    fn read(&self, originator_id: Uuid) -> Result<Vec<S>, DomainError>;
}

/// Appends stored records.
pub trait Writer<S>: Send + Sync {
    /// Appends `records` in order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreIo` if the backend fails.
    fn write(&self, records: Vec<S>) -> Result<(), DomainError>;
}

/// Event store built from a transcoder and a reader/writer pair.
pub struct EventStore<S> {
    encoder: Arc<dyn Encoder<S>>,
    decoder: Arc<dyn Decoder<S>>,
    reader: Arc<dyn Reader<S>>,
    writer: Arc<dyn Writer<S>>,
}

impl<S: 'static> EventStore<S> {
    /// Wires four independent parts together.
    #[must_use]
    pub fn new(
        encoder: Arc<dyn Encoder<S>>,
        decoder: Arc<dyn Decoder<S>>,
        reader: Arc<dyn Reader<S>>,
        writer: Arc<dyn Writer<S>>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            reader,
            writer,
        }
    }

    /// Wires a transcoder and a backend that reads and writes the same records.
    #[must_use]
    pub fn build<T, B>(transcoder: T, backend: B) -> Self
    where
        T: Transcoder<S> + 'static,
        B: Reader<S> + Writer<S> + 'static,
    {
        let transcoder = Arc::new(transcoder);
        let backend = Arc::new(backend);
        Self {
            encoder: transcoder.clone(),
            decoder: transcoder,
            reader: backend.clone(),
            writer: backend,
        }
    }

    /// Returns every event of `originator_id` in append order; empty if the
    /// id has no history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreIo` from the reader or `DomainError::Decoding`
    /// from the decoder.
    #[instrument(skip(self), fields(originator_id = %originator_id))]
    pub fn get(&self, originator_id: Uuid) -> Result<Vec<Event>, DomainError> {
        let events = self
            .reader
            .read(originator_id)?
            .into_iter()
            .map(|stored| self.decoder.decode(stored))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(event_count = events.len(), "loaded events");
        Ok(events)
    }

    /// Encodes and appends `events` in order.
    ///
    /// Every event is encoded before anything is written, so an encoding
    /// failure writes nothing. An empty input does not reach the writer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Encoding` from the encoder or `DomainError::StoreIo`
    /// from the writer.
    #[instrument(skip_all)]
    pub fn put<I>(&self, events: I) -> Result<(), DomainError>
    where
        I: IntoIterator,
        I::Item: Borrow<Event>,
    {
        let records = events
            .into_iter()
            .map(|event| self.encoder.encode(event.borrow()))
            .collect::<Result<Vec<_>, _>>()?;
        if records.is_empty() {
            return Ok(());
        }
        let event_count = records.len();
        self.writer.write(records)?;
        debug!(event_count, "appended events");
        Ok(())
    }

    /// Returns the version of the last stored event of `originator_id`.
    ///
    /// Reads the whole stream and decodes only its last record. A durable
    /// backend should answer this with a dedicated query on its reader side
    /// (e.g. `MAX(version)`) instead of reading the stream.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreIo` from the reader or `DomainError::Decoding`
    /// from the decoder.
    pub fn last_version(&self, originator_id: Uuid) -> Result<Option<u64>, DomainError> {
        self.reader
            .read(originator_id)?
            .pop()
            .map(|stored| self.decoder.decode(stored).map(|event| event.version()))
            .transpose()
    }

    /// Appends `events` only if the last stored version of `originator_id` is
    /// still `expected_version` (`None` for a stream that must not exist yet).
    ///
    /// The check and the write are two separate backend calls; the check
    /// detects stale writers, it does not lock out concurrent ones.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OriginatorMismatch` if an event belongs to another
    /// aggregate, `DomainError::ConcurrencyConflict` if the stored version
    /// moved on, or any error raised by [`Self::put`].
    pub fn put_expecting<I>(
        &self,
        originator_id: Uuid,
        expected_version: Option<u64>,
        events: I,
    ) -> Result<(), DomainError>
    where
        I: IntoIterator,
        I::Item: Borrow<Event>,
    {
        let events: Vec<I::Item> = events.into_iter().collect();
        if let Some(foreign) = events
            .iter()
            .map(|event| <I::Item as Borrow<Event>>::borrow(event).originator_id())
            .find(|id| *id != originator_id)
        {
            return Err(DomainError::OriginatorMismatch {
                expected: originator_id,
                actual: foreign,
            });
        }

        let actual = self.last_version(originator_id)?;
        if actual != expected_version {
            warn!(
                %originator_id,
                expected = ?expected_version,
                actual = ?actual,
                "rejected append on stale version"
            );
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id: originator_id,
                expected: expected_version,
                actual,
            });
        }
        self.put(events)
    }

    /// Reconstructs an aggregate from its stored history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the id has no history, or
    /// any error raised while reading or replaying.
    pub fn load<A: AggregateRoot>(&self, originator_id: Uuid) -> Result<A, DomainError> {
        let events = self.get(originator_id)?;
        if events.is_empty() {
            return Err(DomainError::AggregateNotFound(originator_id));
        }
        A::apply_history(events)
    }

    /// Persists an aggregate's pending events, guarded by its committed
    /// version, and drains them once the write succeeded. Returns the number
    /// of events written.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Uninitialized` for an aggregate without events, or
    /// any error raised by [`Self::put_expecting`]. On error the pending
    /// events stay buffered.
    pub fn save<A: AggregateRoot>(&self, aggregate: &mut A) -> Result<usize, DomainError> {
        let originator_id = aggregate
            .aggregate_id()
            .ok_or(DomainError::Uninitialized(A::KIND))?;
        if aggregate.pending_events().is_empty() {
            return Ok(0);
        }
        self.put_expecting(
            originator_id,
            aggregate.meta().committed_version(),
            aggregate.pending_events(),
        )?;
        Ok(aggregate.collect_events().count())
    }
}

impl<S> fmt::Debug for EventStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStore").finish_non_exhaustive()
    }
}
