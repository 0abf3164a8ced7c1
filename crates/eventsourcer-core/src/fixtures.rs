//! Minimal aggregate used by this crate's unit tests.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::aggregate::{AggregateMeta, AggregateRoot};
use crate::clock::Clock;
use crate::command::{Command, EventEmitter};
use crate::error::DomainError;
use crate::event::Payload;
use crate::registry::EventRegistry;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TestClock(pub DateTime<Utc>);

impl Default for TestClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Tally {
    meta: AggregateMeta,
    pub label: String,
    pub total: i64,
}

fn opened(tally: &mut Tally, payload: &Payload) -> Result<(), DomainError> {
    tally.label = payload.field("label")?;
    tally.total = 0;
    Ok(())
}

fn added(tally: &mut Tally, payload: &Payload) -> Result<(), DomainError> {
    let amount: i64 = payload.field("amount")?;
    if amount < 0 {
        return Err(DomainError::Validation("amount must not be negative".into()));
    }
    tally.total += amount;
    Ok(())
}

// Writes `label` before reading `amount`, so a payload without `amount`
// fails after a partial write.
fn relabeled(tally: &mut Tally, payload: &Payload) -> Result<(), DomainError> {
    tally.label = payload.field("label")?;
    tally.total += payload.field::<i64>("amount")?;
    Ok(())
}

pub(crate) const OPENED: Command<Tally> = crate::command!("TallyOpened" => opened);
pub(crate) const ADDED: Command<Tally> = crate::command!(added);
pub(crate) const RELABELED: Command<Tally> = crate::command!("TallyRelabeled" => relabeled);

static REGISTRY: LazyLock<EventRegistry<Tally>> = LazyLock::new(|| {
    EventRegistry::with_commands(&[OPENED, ADDED, RELABELED])
        .expect("tally event names are distinct")
});

impl AggregateRoot for Tally {
    const KIND: &'static str = "tally";

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

pub(crate) fn open(
    emitter: &EventEmitter<'_, Tally>,
    id: Uuid,
    label: &str,
) -> Result<Tally, DomainError> {
    emitter.draft(id, &OPENED, Payload::new().with("label", label)?)
}

pub(crate) fn add(
    emitter: &EventEmitter<'_, Tally>,
    tally: &mut Tally,
    amount: i64,
) -> Result<(), DomainError> {
    emitter.emit(tally, &ADDED, Payload::new().with("amount", &amount)?)
}
