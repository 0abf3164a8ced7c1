//! Aggregate root abstraction.

use std::borrow::Borrow;
use std::collections::VecDeque;
use std::iter::FusedIterator;

use tracing::trace;
use uuid::Uuid;

use crate::error::DomainError;
use crate::event::Event;
use crate::registry::EventRegistry;

/// Lifecycle state of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateStatus {
    /// No event has been applied yet.
    Uninitialized,
    /// At least one event has been applied.
    Live,
}

/// Bookkeeping every aggregate carries next to its business fields: identity,
/// last applied version and the pending-events buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateMeta {
    id: Option<Uuid>,
    version: Option<u64>,
    pending: VecDeque<Event>,
}

impl AggregateMeta {
    /// The originator id, once an event has been applied.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Version of the last applied event.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Version the next emitted event must carry.
    #[must_use]
    pub fn next_version(&self) -> u64 {
        self.version.map_or(0, |v| v + 1)
    }

    /// Version of the last event already persisted, i.e. the version before
    /// the oldest pending event. `None` for an aggregate nothing of which has
    /// been persisted.
    #[must_use]
    pub fn committed_version(&self) -> Option<u64> {
        match self.pending.front() {
            Some(oldest) => oldest.version().checked_sub(1),
            None => self.version,
        }
    }

    pub(crate) fn push_pending(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    fn record_applied(&mut self, event: &Event) {
        self.id = Some(event.originator_id());
        self.version = Some(event.version());
    }
}

/// An entity whose state is produced only by folding its events.
///
/// `Default` is the uninitialized representation replay starts from.
/// `Clone` lets a mutation run on a scratch copy, so a failing mutation
/// leaves the aggregate untouched. Implementors expose their
/// [`AggregateMeta`] and a registry of mutation functions; every other
/// operation is provided.
pub trait AggregateRoot: Clone + Default + Send + Sync + 'static {
    /// Aggregate type name, used in logs and errors.
    const KIND: &'static str;

    /// The mutation functions of this aggregate type.
    fn registry() -> &'static EventRegistry<Self>;

    /// Returns the aggregate bookkeeping.
    fn meta(&self) -> &AggregateMeta;

    /// Returns the aggregate bookkeeping mutably.
    fn meta_mut(&mut self) -> &mut AggregateMeta;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Option<Uuid> {
        self.meta().id()
    }

    /// Returns the version of the last applied event.
    fn version(&self) -> Option<u64> {
        self.meta().version()
    }

    /// Returns the lifecycle state.
    fn status(&self) -> AggregateStatus {
        if self.meta().version().is_some() {
            AggregateStatus::Live
        } else {
            AggregateStatus::Uninitialized
        }
    }

    /// Applies one event through the registry.
    ///
    /// The event must carry the aggregate's next version and, once the
    /// aggregate has an id, that same id. Applying never touches the pending
    /// buffer. On error the aggregate is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::VersionMismatch`, `DomainError::OriginatorMismatch`,
    /// `DomainError::UnknownEvent`, or the mutation function's own error.
    fn apply_event(&mut self, event: &Event) -> Result<(), DomainError> {
        transact(self, |next| apply_in_place(next, event))
    }

    /// Folds further history into this aggregate, in order. Either every
    /// event is applied or none is.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error raised by [`Self::apply_event`].
    fn replay<I>(&mut self, events: I) -> Result<(), DomainError>
    where
        I: IntoIterator,
        I::Item: Borrow<Event>,
    {
        transact(self, |next| {
            for event in events {
                apply_in_place(next, <I::Item as Borrow<Event>>::borrow(&event))?;
            }
            Ok(())
        })
    }

    /// Reconstructs an aggregate from its full history. The result has no
    /// pending events.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while applying the history.
    fn apply_history<I>(events: I) -> Result<Self, DomainError>
    where
        I: IntoIterator,
        I::Item: Borrow<Event>,
    {
        let mut aggregate = Self::default();
        aggregate.replay(events)?;
        Ok(aggregate)
    }

    /// Reconstructs an aggregate as it was at `version`, ignoring later events.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while applying the history.
    fn apply_history_until<I>(events: I, version: u64) -> Result<Self, DomainError>
    where
        I: IntoIterator,
        I::Item: Borrow<Event>,
    {
        Self::apply_history(
            events
                .into_iter()
                .take_while(|event| <I::Item as Borrow<Event>>::borrow(event).version() <= version),
        )
    }

    /// Events emitted since the last collection, oldest first.
    fn pending_events(&self) -> &VecDeque<Event> {
        &self.meta().pending
    }

    /// Drains the pending buffer, oldest first.
    ///
    /// Dropping the iterator early leaves the remaining events in the buffer
    /// for the next collection.
    fn collect_events(&mut self) -> CollectEvents<'_> {
        CollectEvents {
            pending: &mut self.meta_mut().pending,
        }
    }
}

/// Runs `change` on a copy of `aggregate` and keeps the copy only if
/// `change` succeeds. The pending buffer is set aside rather than copied.
fn transact<A, F>(aggregate: &mut A, change: F) -> Result<(), DomainError>
where
    A: AggregateRoot,
    F: FnOnce(&mut A) -> Result<(), DomainError>,
{
    let pending = std::mem::take(&mut aggregate.meta_mut().pending);
    let mut next = aggregate.clone();
    let outcome = change(&mut next);
    if outcome.is_ok() {
        *aggregate = next;
    }
    aggregate.meta_mut().pending = pending;
    outcome
}

fn apply_in_place<A: AggregateRoot>(aggregate: &mut A, event: &Event) -> Result<(), DomainError> {
    let expected = aggregate.meta().next_version();
    if event.version() != expected {
        return Err(DomainError::VersionMismatch {
            aggregate_id: event.originator_id(),
            expected,
            actual: event.version(),
        });
    }
    if let Some(expected) = aggregate
        .aggregate_id()
        .filter(|id| *id != event.originator_id())
    {
        return Err(DomainError::OriginatorMismatch {
            expected,
            actual: event.originator_id(),
        });
    }

    A::registry().apply(aggregate, event)?;
    aggregate.meta_mut().record_applied(event);
    trace!(
        aggregate_kind = A::KIND,
        event_name = event.name(),
        version = event.version(),
        "applied event"
    );
    Ok(())
}

/// Destructive iterator over an aggregate's pending events.
#[derive(Debug)]
pub struct CollectEvents<'a> {
    pending: &'a mut VecDeque<Event>,
}

impl Iterator for CollectEvents<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pending.len(), Some(self.pending.len()))
    }
}

impl ExactSizeIterator for CollectEvents<'_> {}

impl FusedIterator for CollectEvents<'_> {}
