//! Event registry: event name to state-mutation function.
//!
//! A registry is built once per aggregate type, normally inside a
//! `std::sync::LazyLock`, and is read-only afterwards. Mutation happens only
//! through `&mut self`, so a shared registry can no longer change.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::command::Command;
use crate::error::DomainError;
use crate::event::{Event, Payload};

/// Applies one event's payload to an aggregate instance.
///
/// Creation mutations receive an uninitialized (`Default`) instance and fill
/// it in place.
pub type Mutation<A> = fn(&mut A, &Payload) -> Result<(), DomainError>;

/// Table of mutation functions keyed by event name.
pub struct EventRegistry<A> {
    handlers: HashMap<String, Mutation<A>>,
}

impl<A> EventRegistry<A> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Builds a registry holding every command of an aggregate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateRegistration` if two commands share an
    /// event name but not a mutation function.
    pub fn with_commands(commands: &[Command<A>]) -> Result<Self, DomainError> {
        let mut registry = Self::new();
        for command in commands {
            command.register(&mut registry)?;
        }
        Ok(registry)
    }

    /// Registers `mutation` under `name`.
    ///
    /// Registering the same function again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateRegistration` if `name` already maps to a
    /// different function.
    pub fn register(&mut self, name: &str, mutation: Mutation<A>) -> Result<(), DomainError> {
        if let Some(existing) = self.handlers.get(name) {
            if std::ptr::fn_addr_eq(*existing, mutation) {
                return Ok(());
            }
            return Err(DomainError::DuplicateRegistration(name.to_owned()));
        }
        debug!(event_name = name, "registered event handler");
        self.handlers.insert(name.to_owned(), mutation);
        Ok(())
    }

    /// Returns the mutation function registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEvent` if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Mutation<A>, DomainError> {
        self.handlers
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownEvent(name.to_owned()))
    }

    /// Returns the mutation function registered under `name`, or `default`.
    #[must_use]
    pub fn get_or(&self, name: &str, default: Mutation<A>) -> Mutation<A> {
        self.handlers.get(name).copied().unwrap_or(default)
    }

    /// Returns `true` if a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered event names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Mutates `aggregate` with the handler registered for `event`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEvent` if no handler is registered, or
    /// whatever error the mutation function itself returns.
    pub fn apply(&self, aggregate: &mut A, event: &Event) -> Result<(), DomainError> {
        let mutation = self.get(event.name())?;
        mutation(aggregate, event.payload())
    }
}

impl<A> Default for EventRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EventRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("EventRegistry")
            .field("event_names", &names)
            .finish()
    }
}
