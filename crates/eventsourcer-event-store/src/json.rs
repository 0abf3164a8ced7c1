//! JSON row transcoder.
//!
//! [`StoredEvent`] is the shape a relational or document backend persists:
//! scalar columns for the envelope and a JSON document for the payload.

use chrono::{DateTime, Utc};
use eventsourcer_core::error::DomainError;
use eventsourcer_core::event::{Event, Payload};
use eventsourcer_core::store::{Decoder, Encoder, Originated};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored representation of a domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Aggregate this event belongs to.
    pub originator_id: Uuid,
    /// Event name, routed to the mutation function on replay.
    pub event_name: String,
    /// Serialized payload; always a JSON object.
    pub payload: serde_json::Value,
    /// Version within the aggregate stream (a signed 64-bit column).
    pub version: i64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl Originated for StoredEvent {
    fn originator_id(&self) -> Uuid {
        self.originator_id
    }
}

/// Converts between [`Event`] and [`StoredEvent`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTranscoder;

impl Encoder<StoredEvent> for JsonTranscoder {
    fn encode(&self, event: &Event) -> Result<StoredEvent, DomainError> {
        let version = i64::try_from(event.version()).map_err(|_| {
            DomainError::Encoding(format!(
                "version {} of event {} does not fit a signed 64-bit column",
                event.version(),
                event.name()
            ))
        })?;
        Ok(StoredEvent {
            originator_id: event.originator_id(),
            event_name: event.name().to_owned(),
            payload: serde_json::Value::Object(event.payload().clone().into_inner()),
            version,
            occurred_at: event.created_at(),
        })
    }
}

impl Decoder<StoredEvent> for JsonTranscoder {
    fn decode(&self, stored: StoredEvent) -> Result<Event, DomainError> {
        let version = u64::try_from(stored.version).map_err(|_| {
            DomainError::Decoding(format!(
                "negative version {} in stored event {}",
                stored.version, stored.event_name
            ))
        })?;
        let payload = Payload::try_from(stored.payload)?;
        Ok(Event::new(
            stored.event_name,
            payload,
            version,
            stored.occurred_at,
            stored.originator_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample_event(version: u64) -> Event {
        Event::new(
            "TrickAdded",
            Payload::new()
                .with("trick", "roll over")
                .unwrap()
                .with("difficulty", &3.5)
                .unwrap(),
            version,
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_encode_maps_envelope_to_columns() {
        // Arrange
        let event = sample_event(4);

        // Act
        let stored = JsonTranscoder.encode(&event).unwrap();

        // Assert
        assert_eq!(stored.originator_id, event.originator_id());
        assert_eq!(stored.event_name, "TrickAdded");
        assert_eq!(stored.version, 4);
        assert_eq!(stored.occurred_at, event.created_at());
        assert_eq!(
            stored.payload,
            json!({"trick": "roll over", "difficulty": 3.5})
        );
    }

    #[test]
    fn test_decode_encode_is_lossless() {
        // Arrange
        let event = sample_event(1);

        // Act
        let decoded = JsonTranscoder
            .decode(JsonTranscoder.encode(&event).unwrap())
            .unwrap();

        // Assert
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_decode_survives_text_serialization() {
        // Arrange
        let event = sample_event(2);
        let text = serde_json::to_string(&JsonTranscoder.encode(&event).unwrap()).unwrap();

        // Act
        let stored: StoredEvent = serde_json::from_str(&text).unwrap();
        let decoded = JsonTranscoder.decode(stored).unwrap();

        // Assert
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_encode_rejects_version_beyond_i64() {
        // Arrange
        let event = sample_event(u64::MAX);

        // Act
        let result = JsonTranscoder.encode(&event);

        // Assert
        assert!(matches!(result, Err(DomainError::Encoding(_))));
    }

    #[test]
    fn test_decode_rejects_negative_version() {
        // Arrange
        let mut stored = JsonTranscoder.encode(&sample_event(0)).unwrap();
        stored.version = -1;

        // Act
        let result = JsonTranscoder.decode(stored);

        // Assert
        match result {
            Err(DomainError::Decoding(msg)) => {
                assert_eq!(msg, "negative version -1 in stored event TrickAdded");
            }
            other => panic!("expected Decoding, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_non_object_payload() {
        // Arrange
        let mut stored = JsonTranscoder.encode(&sample_event(0)).unwrap();
        stored.payload = json!("roll over");

        // Act
        let result = JsonTranscoder.decode(stored);

        // Assert
        assert!(matches!(result, Err(DomainError::Decoding(_))));
    }
}
