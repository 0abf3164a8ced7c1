//! Example aggregates built on the eventsourcer core.

pub mod commands;
pub mod dog;
pub mod order;
