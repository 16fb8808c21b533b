use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use fragments_core::{FragmentRecord, OwnerId};

use crate::error::StoreError;
use crate::key::FragmentKey;

/// Result of listing an owner's fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FragmentListing {
    /// Bare fragment ids (`expand = false`).
    Ids(Vec<String>),
    /// Full metadata records (`expand = true`).
    Records(Vec<FragmentRecord>),
}

impl FragmentListing {
    /// An empty listing of the requested shape.
    #[must_use]
    pub fn empty(expand: bool) -> Self {
        if expand {
            Self::Records(Vec::new())
        } else {
            Self::Ids(Vec::new())
        }
    }

    /// Build a listing from records, keeping only ids unless `expand` is set.
    #[must_use]
    pub fn from_records(records: Vec<FragmentRecord>, expand: bool) -> Self {
        if expand {
            Self::Records(records)
        } else {
            Self::Ids(records.into_iter().map(|r| r.id.to_string()).collect())
        }
    }

    /// Number of entries in the listing.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Records(records) => records.len(),
        }
    }

    /// Returns `true` if the listing has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trait for persisting fragment metadata and payloads.
///
/// Metadata records and payload bytes live in separate keyspaces that share
/// the same [`FragmentKey`]. Writes are last-write-wins per key; no
/// operation locks across keys. Implementations must be `Send + Sync` and
/// safe for concurrent access.
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Upsert a metadata record under `(record.owner_id, record.id)`.
    async fn write_fragment(&self, record: &FragmentRecord) -> Result<(), StoreError>;

    /// Read a metadata record. Returns `None` if not found.
    async fn read_fragment(&self, key: &FragmentKey) -> Result<Option<FragmentRecord>, StoreError>;

    /// Store a payload, replacing any previous payload for the key in full.
    async fn write_fragment_data(&self, key: &FragmentKey, data: Bytes) -> Result<(), StoreError>;

    /// Read a payload. Returns `None` if no payload was ever written.
    async fn read_fragment_data(&self, key: &FragmentKey) -> Result<Option<Bytes>, StoreError>;

    /// List every fragment belonging to `owner_id`.
    ///
    /// Returns bare ids unless `expand` is set. An unknown owner yields an
    /// empty listing. Order is defined by the backend but is deterministic
    /// for a given backend instance.
    async fn list_fragments(
        &self,
        owner_id: &OwnerId,
        expand: bool,
    ) -> Result<FragmentListing, StoreError>;

    /// Delete both metadata and payload for a key.
    ///
    /// Returns `true` if anything existed. Deleting a missing key is not an
    /// error.
    async fn delete_fragment(&self, key: &FragmentKey) -> Result<bool, StoreError>;
}
