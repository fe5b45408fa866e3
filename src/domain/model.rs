use crate::utils::error::{EtlError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One page of the remote dataset. `total_pages` is authoritative only when
/// read from page 0; later pages repeat it and we ignore them.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope {
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    pub data: Vec<RawRecord>,
}

/// A record exactly as the source returns it. The source guarantees `_id`,
/// `name` and `trips`; anything else rides along and is dropped by projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl RawRecord {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }
}

/// The flat shape written to the output file: the three projected fields,
/// nothing else. `trips` is opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub trips: serde_json::Value,
}

impl ProjectedRecord {
    /// Projects a raw record down to `_id`, `name`, `trips`, in source order.
    /// A missing key aborts the whole transform; there is no default
    /// substitution. `record` is the record's position in the dataset, for
    /// error reporting.
    pub fn from_raw(raw: &RawRecord, record: usize) -> Result<Self> {
        let id = required(raw, "_id", record)?;
        let name = required(raw, "name", record)?;
        let trips = raw
            .get("trips")
            .cloned()
            .ok_or(EtlError::MissingField {
                field: "trips",
                record,
            })?;

        Ok(Self {
            id: text_of(id),
            name: text_of(name),
            trips,
        })
    }
}

fn required<'a>(raw: &'a RawRecord, field: &'static str, record: usize) -> Result<&'a serde_json::Value> {
    raw.get(field).ok_or(EtlError::MissingField { field, record })
}

fn text_of(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Identifier for one pipeline run, normally supplied by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Timestamp-based id for runs started without an orchestrator-assigned one.
    pub fn generate() -> Self {
        Self(format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S%3fZ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn projection_keeps_exactly_the_three_fields() {
        let record = raw(serde_json::json!({
            "_id": "abc123",
            "name": "Alice",
            "trips": 5,
            "airline": [{"id": 9}],
            "__v": 0
        }));

        let projected = ProjectedRecord::from_raw(&record, 0).unwrap();
        assert_eq!(projected.id, "abc123");
        assert_eq!(projected.name, "Alice");
        assert_eq!(projected.trips, serde_json::json!(5));

        // extra fields must not survive serialization
        let json = serde_json::to_value(&projected).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.contains_key("_id"));
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("trips"));
    }

    #[test]
    fn projection_fails_on_missing_trips() {
        let record = raw(serde_json::json!({"_id": "abc", "name": "Bob"}));

        let err = ProjectedRecord::from_raw(&record, 7).unwrap_err();
        match err {
            EtlError::MissingField { field, record } => {
                assert_eq!(field, "trips");
                assert_eq!(record, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn projection_fails_on_missing_id() {
        let record = raw(serde_json::json!({"name": "Bob", "trips": 2}));
        assert!(matches!(
            ProjectedRecord::from_raw(&record, 0),
            Err(EtlError::MissingField { field: "_id", .. })
        ));
    }

    #[test]
    fn page_envelope_deserializes_source_shape() {
        let envelope: PageEnvelope = serde_json::from_str(
            r#"{"totalPages": 26, "totalPassengers": 251, "data": [{"_id": "1", "name": "A", "trips": 3}]}"#,
        )
        .unwrap();

        assert_eq!(envelope.total_pages, 26);
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(
            envelope.data[0].get("name"),
            Some(&serde_json::json!("A"))
        );
    }
}
