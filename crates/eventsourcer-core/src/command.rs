//! Command declarations and the event-emission pipeline.
//!
//! A command method on an aggregate builds a [`Payload`] from its typed
//! arguments and hands it to an [`EventEmitter`] together with the
//! [`Command`] it implements. The emitter then runs a fixed pipeline:
//! build the event, mutate through the registry, buffer, notify.

use std::fmt;

use tracing::trace;
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::clock::Clock;
use crate::error::DomainError;
use crate::event::{Event, Payload};
use crate::registry::{EventRegistry, Mutation};

/// A command declared on an aggregate: the event name it emits and the
/// mutation function that applies that event.
pub struct Command<A> {
    event_name: &'static str,
    mutation: Mutation<A>,
}

impl<A> Command<A> {
    /// Declares a command emitting `event_name`, applied by `mutation`.
    #[must_use]
    pub const fn new(event_name: &'static str, mutation: Mutation<A>) -> Self {
        Self {
            event_name,
            mutation,
        }
    }

    /// The name of the event this command emits.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// The mutation function applying this command's event.
    #[must_use]
    pub fn mutation(&self) -> Mutation<A> {
        self.mutation
    }

    /// Registers this command's mutation function under its event name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateRegistration` if another function already
    /// owns the event name.
    pub fn register(&self, registry: &mut EventRegistry<A>) -> Result<(), DomainError> {
        registry.register(self.event_name, self.mutation)
    }
}

impl<A> Clone for Command<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Command<A> {}

impl<A> fmt::Debug for Command<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("event_name", &self.event_name)
            .finish_non_exhaustive()
    }
}

/// Declares a [`Command`].
///
/// `command!(added)` names the event after the mutation function;
/// `command!("Added" => added)` names it explicitly.
#[macro_export]
macro_rules! command {
    ($mutation:ident) => {
        $crate::command::Command::new(stringify!($mutation), $mutation)
    };
    ($name:expr => $mutation:path) => {
        $crate::command::Command::new($name, $mutation)
    };
}

/// Receives every event an aggregate emits, after it has been applied and
/// buffered.
pub trait EventListener<A>: Send + Sync {
    /// Called once per emitted event.
    fn notify(&self, aggregate: &A, event: &Event);
}

impl<A, F> EventListener<A> for F
where
    F: Fn(&A, &Event) + Send + Sync,
{
    fn notify(&self, aggregate: &A, event: &Event) {
        self(aggregate, event);
    }
}

/// Runs commands against aggregates: event construction, registry mutation,
/// pending buffer, listener notification, in that order.
pub struct EventEmitter<'a, A> {
    clock: &'a dyn Clock,
    listener: Option<&'a dyn EventListener<A>>,
}

impl<'a, A: AggregateRoot> EventEmitter<'a, A> {
    /// Creates an emitter stamping events with `clock`.
    #[must_use]
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            listener: None,
        }
    }

    /// Attaches a listener notified after each event is buffered.
    #[must_use]
    pub fn with_listener(mut self, listener: &'a dyn EventListener<A>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Creates a new aggregate by running its creation command on an
    /// uninitialized instance.
    ///
    /// # Errors
    ///
    /// Returns any error raised while applying the creation event.
    pub fn draft(
        &self,
        originator_id: Uuid,
        command: &Command<A>,
        payload: Payload,
    ) -> Result<A, DomainError> {
        let mut aggregate = A::default();
        self.emit_for(&mut aggregate, originator_id, command, payload)?;
        Ok(aggregate)
    }

    /// Runs `command` against a live aggregate.
    ///
    /// Nothing is buffered and no listener fires if the mutation fails.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Uninitialized` for an aggregate that was never
    /// drafted or replayed, or any error raised while applying the event.
    pub fn emit(
        &self,
        aggregate: &mut A,
        command: &Command<A>,
        payload: Payload,
    ) -> Result<(), DomainError> {
        let originator_id = aggregate
            .aggregate_id()
            .ok_or(DomainError::Uninitialized(A::KIND))?;
        self.emit_for(aggregate, originator_id, command, payload)
    }

    fn emit_for(
        &self,
        aggregate: &mut A,
        originator_id: Uuid,
        command: &Command<A>,
        payload: Payload,
    ) -> Result<(), DomainError> {
        let event = Event::new(
            command.event_name(),
            payload,
            aggregate.meta().next_version(),
            self.clock.now(),
            originator_id,
        );

        aggregate.apply_event(&event)?;
        trace!(
            aggregate_kind = A::KIND,
            event_name = event.name(),
            version = event.version(),
            "emitted event"
        );
        aggregate.meta_mut().push_pending(event);

        if let (Some(listener), Some(event)) =
            (self.listener, aggregate.pending_events().back())
        {
            listener.notify(aggregate, event);
        }
        Ok(())
    }
}

impl<A> fmt::Debug for EventEmitter<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
