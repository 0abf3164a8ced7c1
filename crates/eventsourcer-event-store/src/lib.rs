//! Eventsourcer Event Store — concrete stores built on the core abstraction.
//!
//! [`list::ListEventStore`] is the in-memory reference store. The
//! [`json::JsonTranscoder`] maps events to row-shaped [`json::StoredEvent`]s
//! and can be combined with any reader/writer pair over that record type,
//! including the list store.

pub mod json;
pub mod list;
