use bytes::Bytes;
use chrono::Utc;

use fragments_core::{FragmentRecord, OwnerId};

use crate::error::StoreError;
use crate::key::FragmentKey;
use crate::store::{FragmentListing, FragmentStore};

fn test_record(owner: &str, id: &str, fragment_type: &str, size: u64) -> FragmentRecord {
    let now = Utc::now();
    FragmentRecord {
        id: id.into(),
        owner_id: owner.into(),
        created: now,
        updated: now,
        fragment_type: fragment_type.to_owned(),
        size,
    }
}

/// Run the full fragment store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if the backend fails an operation.
pub async fn run_store_conformance_tests(store: &dyn FragmentStore) -> Result<(), StoreError> {
    test_read_missing(store).await?;
    test_write_and_read_record(store).await?;
    test_record_last_write_wins(store).await?;
    test_record_without_data(store).await?;
    test_data_replaced_in_full(store).await?;
    test_empty_payload(store).await?;
    test_owners_are_isolated(store).await?;
    test_list_ids_and_records(store).await?;
    test_list_unknown_owner(store).await?;
    test_delete_is_idempotent(store).await?;
    Ok(())
}

async fn test_read_missing(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let key = FragmentKey::new("conf-missing", "nope");
    assert!(
        store.read_fragment(&key).await?.is_none(),
        "read on missing key should return None"
    );
    assert!(
        store.read_fragment_data(&key).await?.is_none(),
        "data read on missing key should return None"
    );
    Ok(())
}

async fn test_write_and_read_record(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let record = test_record("conf-rw", "a", "text/plain; charset=utf-8", 5);
    store.write_fragment(&record).await?;
    let read = store.read_fragment(&FragmentKey::of(&record)).await?;
    assert_eq!(read.as_ref(), Some(&record));
    Ok(())
}

async fn test_record_last_write_wins(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let mut record = test_record("conf-lww", "a", "text/markdown", 1);
    store.write_fragment(&record).await?;
    record.size = 42;
    record.updated = Utc::now();
    store.write_fragment(&record).await?;

    let read = store
        .read_fragment(&FragmentKey::of(&record))
        .await?
        .expect("record should exist");
    assert_eq!(read.size, 42, "second write should win");
    assert_eq!(read, record);
    Ok(())
}

async fn test_record_without_data(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let record = test_record("conf-nodata", "a", "text/plain", 0);
    store.write_fragment(&record).await?;
    let data = store.read_fragment_data(&FragmentKey::of(&record)).await?;
    assert!(data.is_none(), "metadata alone should not create a payload");
    Ok(())
}

async fn test_data_replaced_in_full(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let key = FragmentKey::new("conf-data", "a");
    store
        .write_fragment_data(&key, Bytes::from_static(b"a much longer first payload"))
        .await?;
    store
        .write_fragment_data(&key, Bytes::from_static(&[1, 2, 3]))
        .await?;
    let data = store.read_fragment_data(&key).await?;
    assert_eq!(
        data.as_deref(),
        Some(&[1u8, 2, 3][..]),
        "payload should be replaced, not appended"
    );
    Ok(())
}

async fn test_empty_payload(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let key = FragmentKey::new("conf-empty", "a");
    store.write_fragment_data(&key, Bytes::new()).await?;
    let data = store.read_fragment_data(&key).await?;
    assert_eq!(data, Some(Bytes::new()), "empty payload is still a payload");
    Ok(())
}

async fn test_owners_are_isolated(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let first = test_record("conf-iso-1", "shared-id", "text/plain", 1);
    let second = test_record("conf-iso-2", "shared-id", "application/json", 2);
    store.write_fragment(&first).await?;
    store.write_fragment(&second).await?;
    store
        .write_fragment_data(&FragmentKey::of(&first), Bytes::from_static(b"1"))
        .await?;
    store
        .write_fragment_data(&FragmentKey::of(&second), Bytes::from_static(b"22"))
        .await?;

    let read = store.read_fragment(&FragmentKey::of(&first)).await?;
    assert_eq!(read.as_ref(), Some(&first));
    let data = store.read_fragment_data(&FragmentKey::of(&second)).await?;
    assert_eq!(data.as_deref(), Some(&b"22"[..]));
    Ok(())
}

async fn test_list_ids_and_records(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let owner = OwnerId::new("conf-list");
    for id in ["c", "a", "b"] {
        store
            .write_fragment(&test_record(owner.as_str(), id, "text/plain", 0))
            .await?;
    }

    let ids = store.list_fragments(&owner, false).await?;
    let FragmentListing::Ids(mut ids) = ids else {
        panic!("expand=false should list ids");
    };
    assert_eq!(ids.len(), 3);
    ids.sort();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let records = store.list_fragments(&owner, true).await?;
    let FragmentListing::Records(records) = records else {
        panic!("expand=true should list records");
    };
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.owner_id == owner));

    let again = store.list_fragments(&owner, true).await?;
    assert_eq!(
        again,
        FragmentListing::Records(records),
        "listing order should be deterministic"
    );
    Ok(())
}

async fn test_list_unknown_owner(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let owner = OwnerId::new("conf-nobody");
    assert_eq!(
        store.list_fragments(&owner, false).await?,
        FragmentListing::Ids(Vec::new())
    );
    assert_eq!(
        store.list_fragments(&owner, true).await?,
        FragmentListing::Records(Vec::new())
    );
    Ok(())
}

async fn test_delete_is_idempotent(store: &dyn FragmentStore) -> Result<(), StoreError> {
    let record = test_record("conf-delete", "a", "text/plain", 3);
    let key = FragmentKey::of(&record);
    store.write_fragment(&record).await?;
    store
        .write_fragment_data(&key, Bytes::from_static(b"bye"))
        .await?;

    assert!(store.delete_fragment(&key).await?, "first delete should report existing");
    assert!(store.read_fragment(&key).await?.is_none());
    assert!(store.read_fragment_data(&key).await?.is_none());
    assert!(
        store.list_fragments(&key.owner_id, false).await?.is_empty(),
        "deleted fragment should not be listed"
    );

    let existed = store.delete_fragment(&key).await?;
    assert!(!existed, "second delete should be a no-op");
    Ok(())
}
