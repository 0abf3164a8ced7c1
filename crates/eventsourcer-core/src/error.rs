//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type shared by the registry, aggregates and event stores.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A different mutation function is already registered under this event name.
    #[error("event name already registered with a different handler: {0}")]
    DuplicateRegistration(String),

    /// No mutation function is registered for this event name.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// An aggregate has no recorded history.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// A command was issued against an aggregate that was never drafted or replayed.
    #[error("{0} aggregate is not initialized")]
    Uninitialized(&'static str),

    /// An event does not carry the next version of the aggregate it is applied to.
    #[error("version mismatch on aggregate {aggregate_id}: expected {expected}, found {actual}")]
    VersionMismatch {
        /// The aggregate the event was applied to.
        aggregate_id: Uuid,
        /// The version the aggregate expected next.
        expected: u64,
        /// The version carried by the event.
        actual: u64,
    },

    /// An event originated from a different aggregate.
    #[error("originator mismatch: expected {expected}, found {actual}")]
    OriginatorMismatch {
        /// The aggregate identifier the event should carry.
        expected: Uuid,
        /// The aggregate identifier the event actually carries.
        actual: Uuid,
    },

    /// Optimistic concurrency conflict.
    #[error(
        "concurrency conflict on aggregate {aggregate_id}: expected version {expected:?}, found {actual:?}"
    )]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The last version the writer expected to find (`None` for a new stream).
        expected: Option<u64>,
        /// The last version actually stored (`None` for an empty stream).
        actual: Option<u64>,
    },

    /// An event could not be converted into its stored representation.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A stored record or payload field could not be converted back.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// The underlying reader or writer failed.
    #[error("store I/O error: {0}")]
    StoreIo(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
