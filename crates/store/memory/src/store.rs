use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

use fragments_core::{FragmentId, FragmentRecord, OwnerId};
use fragments_store::error::StoreError;
use fragments_store::key::FragmentKey;
use fragments_store::store::{FragmentListing, FragmentStore};

/// Per-owner partition, ordered by fragment id so listings are stable.
type Partition<V> = BTreeMap<FragmentId, V>;

/// In-memory [`FragmentStore`] backed by two [`DashMap`]s.
///
/// Metadata and payloads live in parallel maps keyed by owner, each holding
/// an ordered map keyed by fragment id. This implementation is fully
/// synchronous internally; the async trait methods return immediately.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryFragmentStore {
    metadata: DashMap<OwnerId, Partition<FragmentRecord>>,
    data: DashMap<OwnerId, Partition<Bytes>>,
}

impl MemoryFragmentStore {
    /// Create a new, empty in-memory fragment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` from the owner's partition, dropping the partition once
    /// it is empty. Returns `true` if the entry existed.
    fn remove_entry<V>(map: &DashMap<OwnerId, Partition<V>>, key: &FragmentKey) -> bool {
        let removed = map
            .get_mut(&key.owner_id)
            .is_some_and(|mut partition| partition.remove(&key.id).is_some());
        map.remove_if(&key.owner_id, |_, partition| partition.is_empty());
        removed
    }
}

#[async_trait]
impl FragmentStore for MemoryFragmentStore {
    async fn write_fragment(&self, record: &FragmentRecord) -> Result<(), StoreError> {
        self.metadata
            .entry(record.owner_id.clone())
            .or_default()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn read_fragment(&self, key: &FragmentKey) -> Result<Option<FragmentRecord>, StoreError> {
        Ok(self
            .metadata
            .get(&key.owner_id)
            .and_then(|partition| partition.get(&key.id).cloned()))
    }

    async fn write_fragment_data(&self, key: &FragmentKey, data: Bytes) -> Result<(), StoreError> {
        self.data
            .entry(key.owner_id.clone())
            .or_default()
            .insert(key.id.clone(), data);
        Ok(())
    }

    async fn read_fragment_data(&self, key: &FragmentKey) -> Result<Option<Bytes>, StoreError> {
        // `Bytes` clones share the buffer, so this does not copy the payload.
        Ok(self
            .data
            .get(&key.owner_id)
            .and_then(|partition| partition.get(&key.id).cloned()))
    }

    async fn list_fragments(
        &self,
        owner_id: &OwnerId,
        expand: bool,
    ) -> Result<FragmentListing, StoreError> {
        let Some(partition) = self.metadata.get(owner_id) else {
            return Ok(FragmentListing::empty(expand));
        };
        let listing = if expand {
            FragmentListing::Records(partition.values().cloned().collect())
        } else {
            FragmentListing::Ids(partition.keys().map(ToString::to_string).collect())
        };
        Ok(listing)
    }

    async fn delete_fragment(&self, key: &FragmentKey) -> Result<bool, StoreError> {
        let had_metadata = Self::remove_entry(&self.metadata, key);
        let had_data = Self::remove_entry(&self.data, key);
        debug!(key = %key, existed = had_metadata || had_data, "deleted fragment");
        Ok(had_metadata || had_data)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use fragments_store::testing::run_store_conformance_tests;

    use super::*;

    fn record(owner: &str, id: &str) -> FragmentRecord {
        let now = Utc::now();
        FragmentRecord {
            id: id.into(),
            owner_id: owner.into(),
            created: now,
            updated: now,
            fragment_type: "text/plain".into(),
            size: 0,
        }
    }

    #[tokio::test]
    async fn conformance() {
        let store = MemoryFragmentStore::new();
        run_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn listing_is_ordered_by_id() {
        let store = MemoryFragmentStore::new();
        for id in ["b", "c", "a"] {
            store.write_fragment(&record("o", id)).await.unwrap();
        }
        let ids = store.list_fragments(&"o".into(), false).await.unwrap();
        assert_eq!(
            ids,
            FragmentListing::Ids(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[tokio::test]
    async fn delete_drops_empty_partitions() {
        let store = MemoryFragmentStore::new();
        let rec = record("solo", "x");
        let key = FragmentKey::of(&rec);
        store.write_fragment(&rec).await.unwrap();
        store
            .write_fragment_data(&key, Bytes::from_static(b"x"))
            .await
            .unwrap();

        assert!(store.delete_fragment(&key).await.unwrap());
        assert!(store.metadata.is_empty());
        assert!(store.data.is_empty());
    }

    #[tokio::test]
    async fn delete_keeps_other_fragments_of_owner() {
        let store = MemoryFragmentStore::new();
        store.write_fragment(&record("o", "keep")).await.unwrap();
        store.write_fragment(&record("o", "drop")).await.unwrap();

        store
            .delete_fragment(&FragmentKey::new("o", "drop"))
            .await
            .unwrap();
        let ids = store.list_fragments(&"o".into(), false).await.unwrap();
        assert_eq!(ids, FragmentListing::Ids(vec!["keep".into()]));
    }

    #[tokio::test]
    async fn concurrent_writes_to_different_keys() {
        let store = Arc::new(MemoryFragmentStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let rec = record("busy", &format!("f-{i:02}"));
                store.write_fragment(&rec).await.unwrap();
                store
                    .write_fragment_data(&FragmentKey::of(&rec), Bytes::from(vec![0u8; i]))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let listing = store.list_fragments(&"busy".into(), false).await.unwrap();
        assert_eq!(listing.len(), 32);
    }
}
