use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left as-is in S3 key components; `/` and `%` are always encoded.
const KEY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Configuration for the DynamoDB + S3 fragment store.
#[derive(Debug, Clone)]
pub struct AwsStoreConfig {
    /// AWS region (e.g. `"us-east-1"`).
    pub region: String,

    /// Optional endpoint URL for local development (e.g. `LocalStack`).
    ///
    /// When set, S3 requests use path-style addressing.
    pub endpoint_url: Option<String>,

    /// `DynamoDB` table holding fragment metadata.
    pub table_name: String,

    /// S3 bucket holding fragment payloads.
    pub bucket: String,

    /// Prefix prepended to every S3 object key (e.g. `"fragments/"`).
    pub key_prefix: String,
}

impl Default for AwsStoreConfig {
    fn default() -> Self {
        Self {
            region: String::from("us-east-1"),
            endpoint_url: None,
            table_name: String::from("fragments"),
            bucket: String::from("fragments"),
            key_prefix: String::new(),
        }
    }
}

impl AwsStoreConfig {
    /// S3 object key for a fragment payload: `{prefix}{owner_id}/{id}`, with
    /// both components percent-encoded.
    pub(crate) fn object_key(&self, owner_id: &str, id: &str) -> String {
        format!(
            "{}{}/{}",
            self.key_prefix,
            utf8_percent_encode(owner_id, KEY_COMPONENT),
            utf8_percent_encode(id, KEY_COMPONENT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = AwsStoreConfig::default();
        assert_eq!(cfg.region, "us-east-1");
        assert!(cfg.endpoint_url.is_none());
        assert_eq!(cfg.table_name, "fragments");
        assert_eq!(cfg.bucket, "fragments");
        assert_eq!(cfg.key_prefix, "");
    }

    #[test]
    fn object_keys() {
        let cfg = AwsStoreConfig::default();
        assert_eq!(cfg.object_key("owner", "abc"), "owner/abc");

        let cfg = AwsStoreConfig {
            key_prefix: "fragments/".into(),
            ..AwsStoreConfig::default()
        };
        assert_eq!(cfg.object_key("owner", "abc"), "fragments/owner/abc");
    }

    #[test]
    fn object_keys_keep_components_apart() {
        let cfg = AwsStoreConfig::default();
        let nested_id = cfg.object_key("a", "b/c");
        let nested_owner = cfg.object_key("a/b", "c");
        assert_eq!(nested_id, "a/b%2Fc");
        assert_eq!(nested_owner, "a%2Fb/c");
        assert_ne!(nested_id, nested_owner);

        assert_eq!(cfg.object_key("o", "50%"), "o/50%25");
        assert_eq!(
            cfg.object_key("11d4c22e", "0b5e6c1e-1a2b-4c3d-8e9f-0123456789ab"),
            "11d4c22e/0b5e6c1e-1a2b-4c3d-8e9f-0123456789ab"
        );
    }
}
