//! The `Order` aggregate: drafted for a customer, then confirmed once.

use std::sync::LazyLock;

use eventsourcer_core::aggregate::{AggregateMeta, AggregateRoot};
use eventsourcer_core::command::{Command, EventEmitter};
use eventsourcer_core::error::DomainError;
use eventsourcer_core::event::Payload;
use eventsourcer_core::registry::EventRegistry;
use uuid::Uuid;

/// Emitted when the order is drafted.
pub const ORDER_DRAFTED: Command<Order> =
    eventsourcer_core::command!("OrderDrafted" => order_drafted);
/// Emitted when a new order is confirmed.
pub const ORDER_CONFIRMED: Command<Order> =
    eventsourcer_core::command!("OrderConfirmed" => order_confirmed);

static REGISTRY: LazyLock<EventRegistry<Order>> = LazyLock::new(|| {
    EventRegistry::with_commands(&[ORDER_DRAFTED, ORDER_CONFIRMED])
        .expect("order event names are distinct")
});

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatus {
    /// Drafted, awaiting confirmation.
    #[default]
    New,
    /// Confirmed; no further transitions.
    Confirmed,
}

/// The aggregate root for an order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    meta: AggregateMeta,
    customer_id: String,
    status: OrderStatus,
}

fn order_drafted(order: &mut Order, payload: &Payload) -> Result<(), DomainError> {
    order.customer_id = payload.field("customer_id")?;
    order.status = OrderStatus::New;
    Ok(())
}

fn order_confirmed(order: &mut Order, _payload: &Payload) -> Result<(), DomainError> {
    order.status = OrderStatus::Confirmed;
    Ok(())
}

impl Order {
    /// Drafts a new order for `customer_id`, buffering `OrderDrafted`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `customer_id` is blank.
    pub fn draft(
        id: Uuid,
        customer_id: &str,
        emitter: &EventEmitter<'_, Self>,
    ) -> Result<Self, DomainError> {
        if customer_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "customer id must not be empty".into(),
            ));
        }
        emitter.draft(
            id,
            &ORDER_DRAFTED,
            Payload::new().with("customer_id", customer_id)?,
        )
    }

    /// Confirms the order, buffering `OrderConfirmed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless the order is `New`, or
    /// `DomainError::Uninitialized` if it was never drafted.
    pub fn confirm(&mut self, emitter: &EventEmitter<'_, Self>) -> Result<(), DomainError> {
        if self.aggregate_id().is_some() && self.status != OrderStatus::New {
            return Err(DomainError::Validation(
                "only NEW orders can be confirmed".into(),
            ));
        }
        emitter.emit(self, &ORDER_CONFIRMED, Payload::new())
    }

    /// The customer the order was drafted for.
    #[must_use]
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn order_status(&self) -> OrderStatus {
        self.status
    }
}

impl AggregateRoot for Order {
    const KIND: &'static str = "order";

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

#[cfg(test)]
mod tests {
    use eventsourcer_core::event::Event;
    use eventsourcer_test_support::FixedClock;

    use super::*;

    #[test]
    fn test_draft_creates_new_order() {
        // Arrange
        let clock = FixedClock::standard();
        let emitter = EventEmitter::new(&clock);

        // Act
        let order = Order::draft(Uuid::new_v4(), "123", &emitter).unwrap();

        // Assert
        assert_eq!(order.customer_id(), "123");
        assert_eq!(order.order_status(), OrderStatus::New);
        assert_eq!(order.pending_events()[0].name(), "OrderDrafted");
    }

    #[test]
    fn test_confirm_moves_new_order_to_confirmed() {
        // Arrange
        let clock = FixedClock::standard();
        let emitter = EventEmitter::new(&clock);
        let mut order = Order::draft(Uuid::new_v4(), "123", &emitter).unwrap();

        // Act
        order.confirm(&emitter).unwrap();

        // Assert
        assert_eq!(order.order_status(), OrderStatus::Confirmed);
        let last = order.pending_events().back().unwrap();
        assert_eq!(last.name(), "OrderConfirmed");
        assert_eq!(last.version(), 1);
        assert!(last.payload().is_empty());
    }

    #[test]
    fn test_confirm_twice_is_rejected() {
        // Arrange
        let clock = FixedClock::standard();
        let emitter = EventEmitter::new(&clock);
        let mut order = Order::draft(Uuid::new_v4(), "123", &emitter).unwrap();
        order.confirm(&emitter).unwrap();

        // Act
        let result = order.confirm(&emitter);

        // Assert
        match result {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "only NEW orders can be confirmed");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(order.pending_events().len(), 2);
    }

    #[test]
    fn test_confirm_undrafted_order_is_uninitialized() {
        // Arrange
        let clock = FixedClock::standard();
        let emitter = EventEmitter::new(&clock);
        let mut order = Order::default();

        // Act
        let result = order.confirm(&emitter);

        // Assert
        assert!(matches!(result, Err(DomainError::Uninitialized("order"))));
    }

    #[test]
    fn test_replay_restores_confirmed_status() {
        // Arrange
        let clock = FixedClock::standard();
        let emitter = EventEmitter::new(&clock);
        let mut order = Order::draft(Uuid::new_v4(), "123", &emitter).unwrap();
        order.confirm(&emitter).unwrap();
        let events: Vec<Event> = order.collect_events().collect();

        // Act
        let drafted_only = Order::apply_history_until(&events, 0).unwrap();
        let replayed = Order::apply_history(events).unwrap();

        // Assert
        assert_eq!(drafted_only.order_status(), OrderStatus::New);
        assert_eq!(replayed.order_status(), OrderStatus::Confirmed);
        assert_eq!(replayed.customer_id(), "123");
    }
}
