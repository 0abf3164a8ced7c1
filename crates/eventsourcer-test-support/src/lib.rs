//! Shared test doubles for the eventsourcer crates.

mod backend;
mod clock;
mod listener;

pub use backend::{FailingBackend, FailingEncoder, RecordingBackend};
pub use clock::FixedClock;
pub use listener::RecordingListener;
