use std::sync::Arc;

use fragments_store::FragmentStore;
#[cfg(feature = "aws")]
use fragments_store_aws::{AwsFragmentStore, AwsStoreConfig, build_clients, create_table};
use fragments_store_fs::{FsConfig, FsFragmentStore};
use fragments_store_memory::MemoryFragmentStore;

use crate::config::StoreConfig;
use crate::error::ServerError;

/// Construct the configured [`FragmentStore`].
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn FragmentStore>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryFragmentStore::new())),
        "fs" => create_fs(config).await,
        #[cfg(feature = "aws")]
        "aws" => create_aws(config).await,
        other => Err(ServerError::Config(format!(
            "unsupported store backend: {other} (is the feature enabled?)"
        ))),
    }
}

async fn create_fs(config: &StoreConfig) -> Result<Arc<dyn FragmentStore>, ServerError> {
    let fs_config = config
        .path
        .clone()
        .map_or_else(FsConfig::default, FsConfig::new);
    let store = FsFragmentStore::new(fs_config)
        .await
        .map_err(|e| ServerError::Config(format!("fs store: {e}")))?;
    Ok(Arc::new(store))
}

#[cfg(feature = "aws")]
async fn create_aws(config: &StoreConfig) -> Result<Arc<dyn FragmentStore>, ServerError> {
    let defaults = AwsStoreConfig::default();
    let aws_config = AwsStoreConfig {
        region: config.region.clone().unwrap_or(defaults.region),
        endpoint_url: config.endpoint_url.clone(),
        table_name: config.table_name.clone().unwrap_or(defaults.table_name),
        bucket: config.bucket.clone().unwrap_or(defaults.bucket),
        key_prefix: config.prefix.clone().unwrap_or(defaults.key_prefix),
    };

    let (dynamo, s3) = build_clients(&aws_config).await;

    // Against a local emulator, create the table so a fresh stack works.
    if aws_config.endpoint_url.is_some() {
        create_table(&dynamo, &aws_config.table_name)
            .await
            .map_err(|e| ServerError::Config(format!("dynamodb create table: {e}")))?;
    }

    Ok(Arc::new(AwsFragmentStore::from_clients(dynamo, s3, aws_config)))
}

#[cfg(test)]
mod tests {
    use fragments_core::OwnerId;

    use super::*;

    #[tokio::test]
    async fn memory_is_the_default() {
        let store = create_store(&StoreConfig::default()).await.unwrap();
        let listing = store
            .list_fragments(&OwnerId::new("o"), false)
            .await
            .unwrap();
        assert!(listing.is_empty());
    }

    #[tokio::test]
    async fn fs_backend_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");
        let config = StoreConfig {
            backend: "fs".into(),
            path: Some(root.clone()),
            ..StoreConfig::default()
        };
        create_store(&config).await.unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn unknown_backend_is_a_config_error() {
        let config = StoreConfig {
            backend: "redis".into(),
            ..StoreConfig::default()
        };
        let Err(err) = create_store(&config).await else {
            panic!("expected an error");
        };
        assert!(matches!(err, ServerError::Config(_)));
    }
}
