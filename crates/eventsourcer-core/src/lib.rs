//! Eventsourcer Core — event-sourced aggregates and event store abstractions.
//!
//! Aggregates change state only by emitting events: a command builds a
//! payload, the [`command::EventEmitter`] wraps it in an [`event::Event`],
//! applies it through the aggregate's [`registry::EventRegistry`] and buffers
//! it until [`store::EventStore::save`] persists it. Replaying the stored
//! history through the same registry rebuilds the aggregate.
//!
//! This crate contains no storage backend; see `eventsourcer-event-store`.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod registry;
pub mod store;

#[cfg(test)]
mod fixtures;
