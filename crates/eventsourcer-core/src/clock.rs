//! Time source for event timestamps.
//!
//! `Event::created_at` is audit data only, so the clock is injected rather
//! than read from the system inside command methods. Tests pin it.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Supplies the creation timestamp of emitted events.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
