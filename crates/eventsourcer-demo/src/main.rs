//! Eventsourcer demo runner entry point.

use eventsourcer_core::clock::SystemClock;
use eventsourcer_core::store::EventStore;
use eventsourcer_demo::config::{DemoConfig, EventEncoding, LogFormat};
use eventsourcer_demo::error::AppError;
use eventsourcer_demo::scenarios::{run_dog_scenario, run_order_scenario};
use eventsourcer_event_store::json::{JsonTranscoder, StoredEvent};
use eventsourcer_event_store::list::{EventList, ListEventStore};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    let config = DemoConfig::from_env()?;

    // Initialize tracing subscriber.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init(),
    }

    tracing::info!(encoding = ?config.event_encoding, "Starting eventsourcer demo");

    match config.event_encoding {
        EventEncoding::Identity => run(&ListEventStore::build()),
        EventEncoding::Json => run(&ListEventStore::build_on(
            EventList::<StoredEvent>::new(),
            JsonTranscoder,
        )),
    }
}

fn run<S: 'static>(store: &EventStore<S>) -> Result<(), AppError> {
    let clock = SystemClock;
    run_dog_scenario(store, &clock)?;
    run_order_scenario(store, &clock)?;
    tracing::info!("Demo finished");
    Ok(())
}
