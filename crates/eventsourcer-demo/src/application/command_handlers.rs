//! Command handlers for the example aggregates.
//!
//! Each handler orchestrates one use case: load (or draft) the aggregate,
//! run the command, persist the pending events. Handlers return the events
//! they persisted.

use eventsourcer_core::aggregate::AggregateRoot;
use eventsourcer_core::clock::Clock;
use eventsourcer_core::command::EventEmitter;
use eventsourcer_core::error::DomainError;
use eventsourcer_core::event::Event;
use eventsourcer_core::store::EventStore;

use crate::domain::commands::{ConfirmOrder, CreateDog, DraftOrder, TeachTricks};
use crate::domain::dog::Dog;
use crate::domain::order::Order;

/// Saves the aggregate's pending events and returns them.
fn persist<A: AggregateRoot, S: 'static>(
    aggregate: &mut A,
    store: &EventStore<S>,
) -> Result<Vec<Event>, DomainError> {
    let events: Vec<Event> = aggregate.pending_events().iter().cloned().collect();
    store.save(aggregate)?;
    Ok(events)
}

/// Handles the `CreateDog` command: drafts a fresh dog and persists
/// `DogCreated`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name, or
/// `DomainError::ConcurrencyConflict` if the id already has history.
pub fn handle_create_dog<S: 'static>(
    command: &CreateDog,
    clock: &dyn Clock,
    store: &EventStore<S>,
) -> Result<Vec<Event>, DomainError> {
    let emitter = EventEmitter::new(clock);
    let mut dog = Dog::draft(command.dog_id, &command.name, &emitter)?;
    persist(&mut dog, store)
}

/// Handles the `TeachTricks` command: reconstitutes the dog, teaches every
/// trick, and persists one `TrickAdded` per trick.
///
/// Nothing is persisted if any trick is rejected.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown dog, or any error
/// raised while teaching or saving.
pub fn handle_teach_tricks<S: 'static>(
    command: &TeachTricks,
    clock: &dyn Clock,
    store: &EventStore<S>,
) -> Result<Vec<Event>, DomainError> {
    let emitter = EventEmitter::new(clock);
    let mut dog: Dog = store.load(command.dog_id)?;
    dog.learn_tricks(command.tricks.iter().map(String::as_str), &emitter)?;
    persist(&mut dog, store)
}

/// Handles the `DraftOrder` command: drafts a fresh order and persists
/// `OrderDrafted`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank customer id, or
/// `DomainError::ConcurrencyConflict` if the id already has history.
pub fn handle_draft_order<S: 'static>(
    command: &DraftOrder,
    clock: &dyn Clock,
    store: &EventStore<S>,
) -> Result<Vec<Event>, DomainError> {
    let emitter = EventEmitter::new(clock);
    let mut order = Order::draft(command.order_id, &command.customer_id, &emitter)?;
    persist(&mut order, store)
}

/// Handles the `ConfirmOrder` command: reconstitutes the order, confirms it,
/// and persists `OrderConfirmed`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown order,
/// `DomainError::Validation` if it is already confirmed, or any error raised
/// while saving.
pub fn handle_confirm_order<S: 'static>(
    command: &ConfirmOrder,
    clock: &dyn Clock,
    store: &EventStore<S>,
) -> Result<Vec<Event>, DomainError> {
    let emitter = EventEmitter::new(clock);
    let mut order: Order = store.load(command.order_id)?;
    order.confirm(&emitter)?;
    persist(&mut order, store)
}
