use serde::{Deserialize, Serialize};

use fragments_core::{FragmentId, FragmentRecord, OwnerId};

/// Key addressing both the metadata record and the payload of a fragment.
///
/// The owner is always the outer component so per-owner scans stay local to
/// one partition of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentKey {
    pub owner_id: OwnerId,
    pub id: FragmentId,
}

impl FragmentKey {
    /// Create a new fragment key.
    #[must_use]
    pub fn new(owner_id: impl Into<OwnerId>, id: impl Into<FragmentId>) -> Self {
        Self {
            owner_id: owner_id.into(),
            id: id.into(),
        }
    }

    /// The key a record is stored under.
    #[must_use]
    pub fn of(record: &FragmentRecord) -> Self {
        Self {
            owner_id: record.owner_id.clone(),
            id: record.id.clone(),
        }
    }

    /// Return a canonical string representation: `owner_id:id`
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}:{}", self.owner_id, self.id)
    }
}

impl std::fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn canonical_form() {
        let key = FragmentKey::new("owner-1", "frag-1");
        assert_eq!(key.canonical(), "owner-1:frag-1");
        assert_eq!(key.to_string(), "owner-1:frag-1");
    }

    #[test]
    fn key_of_record() {
        let now = Utc::now();
        let record = FragmentRecord {
            id: "f".into(),
            owner_id: "o".into(),
            created: now,
            updated: now,
            fragment_type: "text/plain".into(),
            size: 0,
        };
        assert_eq!(FragmentKey::of(&record), FragmentKey::new("o", "f"));
    }
}
