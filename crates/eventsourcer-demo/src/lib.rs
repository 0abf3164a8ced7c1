//! Eventsourcer demo — example aggregates and the services that drive them.
//!
//! `Dog` and `Order` exercise the core: commands buffer events, the list
//! event store persists them, and loading replays them.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod scenarios;
