//! Commands accepted by the example aggregates.

use uuid::Uuid;

/// Command to create a new dog.
#[derive(Debug, Clone)]
pub struct CreateDog {
    /// The dog identifier.
    pub dog_id: Uuid,
    /// The dog's name.
    pub name: String,
}

/// Command to teach a dog one or more tricks.
#[derive(Debug, Clone)]
pub struct TeachTricks {
    /// The dog identifier.
    pub dog_id: Uuid,
    /// Tricks to learn, in order.
    pub tricks: Vec<String>,
}

/// Command to draft a new order.
#[derive(Debug, Clone)]
pub struct DraftOrder {
    /// The order identifier.
    pub order_id: Uuid,
    /// The ordering customer.
    pub customer_id: String,
}

/// Command to confirm a drafted order.
#[derive(Debug, Clone)]
pub struct ConfirmOrder {
    /// The order identifier.
    pub order_id: Uuid,
}
