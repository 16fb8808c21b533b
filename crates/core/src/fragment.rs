use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FragmentId, OwnerId};

/// Persisted metadata for a fragment.
///
/// This is the shape every storage backend reads and writes. The payload
/// bytes are stored separately under the same `(owner_id, id)` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRecord {
    /// Unique fragment identifier.
    pub id: FragmentId,
    /// Owner the fragment belongs to.
    pub owner_id: OwnerId,
    /// When the fragment was created.
    pub created: DateTime<Utc>,
    /// When the metadata or payload was last written.
    pub updated: DateTime<Utc>,
    /// Raw Content-Type value, parameters included.
    #[serde(rename = "type")]
    pub fragment_type: String,
    /// Length of the current payload in bytes.
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FragmentRecord {
        let at = DateTime::parse_from_rfc3339("2026-10-18T09:30:00.000Z")
            .unwrap()
            .with_timezone(&Utc);
        FragmentRecord {
            id: FragmentId::new("30a84843-0cd4-4975-95ba-b96112aea189"),
            owner_id: OwnerId::new("11d4c22e42c8f61feaba154683dea407"),
            created: at,
            updated: at,
            fragment_type: "text/plain; charset=utf-8".into(),
            size: 256,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["ownerId"], "11d4c22e42c8f61feaba154683dea407");
        assert_eq!(json["type"], "text/plain; charset=utf-8");
        assert_eq!(json["size"], 256);
        assert_eq!(json["created"], "2026-10-18T09:30:00Z");
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn deserializes_iso_timestamps_with_millis() {
        let json = r#"{
            "id": "abc",
            "ownerId": "owner",
            "created": "2021-11-02T15:09:50.403Z",
            "updated": "2021-11-02T15:09:50.403Z",
            "type": "text/markdown",
            "size": 0
        }"#;
        let record: FragmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_str(), "abc");
        assert_eq!(record.fragment_type, "text/markdown");
        assert_eq!(record.created, record.updated);
    }

    #[test]
    fn rejects_negative_size() {
        let json = r#"{"id":"a","ownerId":"o","created":"2021-11-02T15:09:50Z",
            "updated":"2021-11-02T15:09:50Z","type":"text/plain","size":-1}"#;
        assert!(serde_json::from_str::<FragmentRecord>(json).is_err());
    }
}
