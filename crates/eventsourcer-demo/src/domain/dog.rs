//! The `Dog` aggregate: a name and the tricks it has learned.

use std::sync::LazyLock;

use eventsourcer_core::aggregate::{AggregateMeta, AggregateRoot};
use eventsourcer_core::command::{Command, EventEmitter};
use eventsourcer_core::error::DomainError;
use eventsourcer_core::event::Payload;
use eventsourcer_core::registry::EventRegistry;
use uuid::Uuid;

/// Emitted once, when the dog is created.
pub const DOG_CREATED: Command<Dog> = eventsourcer_core::command!("DogCreated" => dog_created);
/// Emitted for every trick the dog learns.
pub const TRICK_ADDED: Command<Dog> = eventsourcer_core::command!("TrickAdded" => trick_added);

static REGISTRY: LazyLock<EventRegistry<Dog>> = LazyLock::new(|| {
    EventRegistry::with_commands(&[DOG_CREATED, TRICK_ADDED])
        .expect("dog event names are distinct")
});

/// The aggregate root for a dog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dog {
    meta: AggregateMeta,
    name: String,
    tricks: Vec<String>,
}

fn dog_created(dog: &mut Dog, payload: &Payload) -> Result<(), DomainError> {
    dog.name = payload.field("name")?;
    dog.tricks = Vec::new();
    Ok(())
}

fn trick_added(dog: &mut Dog, payload: &Payload) -> Result<(), DomainError> {
    dog.tricks.push(payload.field("trick")?);
    Ok(())
}

impl Dog {
    /// Creates a new dog, buffering `DogCreated`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn draft(
        id: Uuid,
        name: &str,
        emitter: &EventEmitter<'_, Self>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation("dog name must not be empty".into()));
        }
        emitter.draft(id, &DOG_CREATED, Payload::new().with("name", name)?)
    }

    /// Teaches the dog one trick, buffering `TrickAdded`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `trick` is blank, or
    /// `DomainError::Uninitialized` if the dog was never created.
    pub fn add_trick(
        &mut self,
        trick: &str,
        emitter: &EventEmitter<'_, Self>,
    ) -> Result<(), DomainError> {
        if trick.trim().is_empty() {
            return Err(DomainError::Validation("trick must not be empty".into()));
        }
        emitter.emit(self, &TRICK_ADDED, Payload::new().with("trick", trick)?)
    }

    /// Teaches several tricks in order; each one buffers its own `TrickAdded`.
    ///
    /// Stops at the first failure, keeping the tricks learned before it.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::add_trick`].
    pub fn learn_tricks<'t>(
        &mut self,
        tricks: impl IntoIterator<Item = &'t str>,
        emitter: &EventEmitter<'_, Self>,
    ) -> Result<(), DomainError> {
        for trick in tricks {
            self.add_trick(trick, emitter)?;
        }
        Ok(())
    }

    /// The dog's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tricks in the order they were learned.
    #[must_use]
    pub fn tricks(&self) -> &[String] {
        &self.tricks
    }
}

impl AggregateRoot for Dog {
    const KIND: &'static str = "dog";

    fn registry() -> &'static EventRegistry<Self> {
        &REGISTRY
    }

    fn meta(&self) -> &AggregateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut AggregateMeta {
        &mut self.meta
    }
}
