//! End-to-end runs of the example aggregates against one event store.

use eventsourcer_core::clock::Clock;
use eventsourcer_core::error::DomainError;
use eventsourcer_core::store::EventStore;
use tracing::info;
use uuid::Uuid;

use crate::application::command_handlers::{
    handle_confirm_order, handle_create_dog, handle_draft_order, handle_teach_tricks,
};
use crate::domain::commands::{ConfirmOrder, CreateDog, DraftOrder, TeachTricks};
use crate::domain::dog::Dog;
use crate::domain::order::Order;

/// Creates a dog, teaches it tricks, and reloads it from the store.
///
/// # Errors
///
/// Returns the first error raised by a handler or by the final load.
pub fn run_dog_scenario<S: 'static>(
    store: &EventStore<S>,
    clock: &dyn Clock,
) -> Result<Dog, DomainError> {
    let dog_id = Uuid::now_v7();
    handle_create_dog(
        &CreateDog {
            dog_id,
            name: "Roxie".to_owned(),
        },
        clock,
        store,
    )?;
    handle_teach_tricks(
        &TeachTricks {
            dog_id,
            tricks: vec!["roll over".to_owned(), "play dead".to_owned()],
        },
        clock,
        store,
    )?;

    let dog: Dog = store.load(dog_id)?;
    info!(%dog_id, name = dog.name(), tricks = ?dog.tricks(), "dog replayed");
    Ok(dog)
}

/// Drafts an order, confirms it, and reloads it from the store.
///
/// # Errors
///
/// Returns the first error raised by a handler or by the final load.
pub fn run_order_scenario<S: 'static>(
    store: &EventStore<S>,
    clock: &dyn Clock,
) -> Result<Order, DomainError> {
    let order_id = Uuid::now_v7();
    handle_draft_order(
        &DraftOrder {
            order_id,
            customer_id: "123".to_owned(),
        },
        clock,
        store,
    )?;
    handle_confirm_order(&ConfirmOrder { order_id }, clock, store)?;

    let order: Order = store.load(order_id)?;
    info!(%order_id, status = ?order.order_status(), "order replayed");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use eventsourcer_core::aggregate::AggregateRoot;
    use eventsourcer_event_store::json::{JsonTranscoder, StoredEvent};
    use eventsourcer_event_store::list::{EventList, ListEventStore};
    use eventsourcer_test_support::FixedClock;

    use super::*;
    use crate::domain::order::OrderStatus;

    #[test]
    fn test_dog_scenario_over_identity_store() {
        // Arrange
        let clock = FixedClock::standard();
        let store = ListEventStore::build();

        // Act
        let dog = run_dog_scenario(&store, &clock).unwrap();

        // Assert
        assert_eq!(dog.name(), "Roxie");
        assert_eq!(dog.tricks(), ["roll over", "play dead"]);
        assert_eq!(dog.version(), Some(2));
        assert!(dog.pending_events().is_empty());
    }

    #[test]
    fn test_order_scenario_over_json_store() {
        // Arrange
        let clock = FixedClock::standard();
        let list: EventList<StoredEvent> = EventList::new();
        let store = ListEventStore::build_on(list.clone(), JsonTranscoder);

        // Act
        let order = run_order_scenario(&store, &clock).unwrap();

        // Assert
        assert_eq!(order.order_status(), OrderStatus::Confirmed);
        let names: Vec<String> = list
            .records()
            .unwrap()
            .into_iter()
            .map(|(_, row)| row.event_name)
            .collect();
        assert_eq!(names, ["OrderDrafted", "OrderConfirmed"]);
    }
}
