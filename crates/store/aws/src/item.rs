//! Mapping between [`FragmentRecord`] and `DynamoDB` items.
//!
//! The item carries the persisted record shape verbatim: `ownerId` is the
//! partition key, `id` the sort key, timestamps are RFC 3339 strings and
//! `size` is numeric.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};

use fragments_core::FragmentRecord;
use fragments_store::error::StoreError;

pub(crate) const OWNER_ID: &str = "ownerId";
pub(crate) const ID: &str = "id";
const CREATED: &str = "created";
const UPDATED: &str = "updated";
const TYPE: &str = "type";
const SIZE: &str = "size";

pub(crate) type Item = HashMap<String, AttributeValue>;

fn timestamp(at: &DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

pub(crate) fn to_item(record: &FragmentRecord) -> Item {
    HashMap::from([
        (OWNER_ID.to_owned(), AttributeValue::S(record.owner_id.to_string())),
        (ID.to_owned(), AttributeValue::S(record.id.to_string())),
        (CREATED.to_owned(), timestamp(&record.created)),
        (UPDATED.to_owned(), timestamp(&record.updated)),
        (TYPE.to_owned(), AttributeValue::S(record.fragment_type.clone())),
        (SIZE.to_owned(), AttributeValue::N(record.size.to_string())),
    ])
}

pub(crate) fn string_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value),
        _ => Err(StoreError::Serialization(format!(
            "item is missing string attribute '{name}'"
        ))),
    }
}

fn timestamp_attr(item: &Item, name: &str) -> Result<DateTime<Utc>, StoreError> {
    let raw = string_attr(item, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("attribute '{name}': {e}")))
}

pub(crate) fn from_item(item: &Item) -> Result<FragmentRecord, StoreError> {
    let size = match item.get(SIZE) {
        Some(AttributeValue::N(n)) => n
            .parse::<u64>()
            .map_err(|e| StoreError::Serialization(format!("attribute 'size': {e}")))?,
        _ => {
            return Err(StoreError::Serialization(
                "item is missing numeric attribute 'size'".into(),
            ));
        }
    };

    Ok(FragmentRecord {
        id: string_attr(item, ID)?.into(),
        owner_id: string_attr(item, OWNER_ID)?.into(),
        created: timestamp_attr(item, CREATED)?,
        updated: timestamp_attr(item, UPDATED)?,
        fragment_type: string_attr(item, TYPE)?.to_owned(),
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FragmentRecord {
        let created = DateTime::parse_from_rfc3339("2026-10-18T09:30:00.123Z")
            .unwrap()
            .with_timezone(&Utc);
        FragmentRecord {
            id: "frag".into(),
            owner_id: "owner".into(),
            created,
            updated: created + chrono::Duration::seconds(5),
            fragment_type: "text/csv".into(),
            size: 1024,
        }
    }

    #[test]
    fn item_shape() {
        let item = to_item(&sample());
        assert_eq!(item.get("ownerId"), Some(&AttributeValue::S("owner".into())));
        assert_eq!(item.get("id"), Some(&AttributeValue::S("frag".into())));
        assert_eq!(item.get("size"), Some(&AttributeValue::N("1024".into())));
        assert_eq!(
            item.get("created"),
            Some(&AttributeValue::S("2026-10-18T09:30:00.123Z".into()))
        );
    }

    #[test]
    fn item_round_trip_preserves_record() {
        let record = sample();
        assert_eq!(from_item(&to_item(&record)).unwrap(), record);
    }

    #[test]
    fn missing_attribute_is_serialization_error() {
        let mut item = to_item(&sample());
        item.remove("type");
        assert!(matches!(
            from_item(&item),
            Err(StoreError::Serialization(msg)) if msg.contains("type")
        ));
    }

    #[test]
    fn bad_size_is_serialization_error() {
        let mut item = to_item(&sample());
        item.insert("size".into(), AttributeValue::N("-3".into()));
        assert!(matches!(from_item(&item), Err(StoreError::Serialization(_))));
    }
}
