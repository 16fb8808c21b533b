use std::path::PathBuf;

use serde::Deserialize;

/// Configuration for the fragment storage backend.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Which backend to use: `"memory"`, `"fs"`, or `"aws"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Root directory for the `fs` backend. Defaults to `./data`.
    pub path: Option<PathBuf>,

    /// AWS region for the `aws` backend.
    pub region: Option<String>,

    /// Custom AWS endpoint (`LocalStack` and similar).
    pub endpoint_url: Option<String>,

    /// `DynamoDB` metadata table name.
    pub table_name: Option<String>,

    /// S3 bucket holding fragment payloads.
    pub bucket: Option<String>,

    /// Key prefix for S3 objects.
    pub prefix: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
            region: None,
            endpoint_url: None,
            table_name: None,
            bucket: None,
            prefix: None,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}
