//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::DomainError;

/// Named arguments captured from a command invocation.
///
/// Fields keep the order in which they were added, which is the order the
/// command declared them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named field, serializing `value` into the payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Encoding` if `value` cannot be represented as JSON.
    pub fn with<T: Serialize + ?Sized>(
        mut self,
        name: &str,
        value: &T,
    ) -> Result<Self, DomainError> {
        let value = serde_json::to_value(value)
            .map_err(|e| DomainError::Encoding(format!("payload field `{name}`: {e}")))?;
        self.0.insert(name.to_owned(), value);
        Ok(self)
    }

    /// Reads a named field back into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Decoding` if the field is missing or has the wrong shape.
    pub fn field<T: DeserializeOwned>(&self, name: &str) -> Result<T, DomainError> {
        let value = self
            .0
            .get(name)
            .ok_or_else(|| DomainError::Decoding(format!("missing payload field `{name}`")))?;
        T::deserialize(value)
            .map_err(|e| DomainError::Decoding(format!("payload field `{name}`: {e}")))
    }

    /// Returns the raw JSON value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Consumes the payload, returning the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Payload {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DomainError::Decoding(format!(
                "payload must be a JSON object, got {other}"
            ))),
        }
    }
}

/// Immutable record of something that happened to an aggregate.
///
/// Versions start at 0 for the creation event and increase by one for every
/// later event of the same originator. `created_at` is informational only and
/// never used for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    name: String,
    payload: Payload,
    version: u64,
    created_at: DateTime<Utc>,
    originator_id: Uuid,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        payload: Payload,
        version: u64,
        created_at: DateTime<Utc>,
        originator_id: Uuid,
    ) -> Self {
        Self {
            name: name.into(),
            payload,
            version,
            created_at,
            originator_id,
        }
    }

    /// The event name, used to look up its mutation function.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The named arguments of the command that produced this event.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Position of this event within its originator's history.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// When the event was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The aggregate this event belongs to.
    #[must_use]
    pub fn originator_id(&self) -> Uuid {
        self.originator_id
    }
}
