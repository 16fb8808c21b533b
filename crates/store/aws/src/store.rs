use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, instrument};

use fragments_core::{FragmentRecord, OwnerId};
use fragments_store::error::StoreError;
use fragments_store::key::FragmentKey;
use fragments_store::store::{FragmentListing, FragmentStore};

use crate::config::AwsStoreConfig;
use crate::item::{self, ID, OWNER_ID};

/// Build `DynamoDB` and S3 clients from the provided configuration.
///
/// Loads AWS credentials from the standard environment chain and optionally
/// overrides the endpoint URL for local development.
pub async fn build_clients(
    config: &AwsStoreConfig,
) -> (aws_sdk_dynamodb::Client, aws_sdk_s3::Client) {
    let mut loader = aws_config::from_env().region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        debug!(endpoint = %endpoint, "using custom AWS endpoint");
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    let dynamo = aws_sdk_dynamodb::Client::new(&sdk_config);
    // Local emulators do not resolve virtual-hosted bucket names.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();
    let s3 = aws_sdk_s3::Client::from_conf(s3_config);
    (dynamo, s3)
}

/// AWS-backed implementation of [`FragmentStore`].
///
/// Metadata records are items in a `DynamoDB` table keyed by (`ownerId`,
/// `id`); payloads are S3 objects under `{prefix}{ownerId}/{id}`. The two
/// writes are independent, matching the store contract: nothing ties a
/// metadata write to a payload write.
pub struct AwsFragmentStore {
    dynamo: aws_sdk_dynamodb::Client,
    s3: aws_sdk_s3::Client,
    config: AwsStoreConfig,
}

impl std::fmt::Debug for AwsFragmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsFragmentStore")
            .field("config", &self.config)
            .field("dynamo", &"<DynamoDbClient>")
            .field("s3", &"<S3Client>")
            .finish()
    }
}

impl AwsFragmentStore {
    /// Create a new `AwsFragmentStore`, building SDK clients from the
    /// environment.
    pub async fn new(config: AwsStoreConfig) -> Self {
        let (dynamo, s3) = build_clients(&config).await;
        Self {
            dynamo,
            s3,
            config,
        }
    }

    /// Create a store from existing clients (for sharing or testing).
    pub fn from_clients(
        dynamo: aws_sdk_dynamodb::Client,
        s3: aws_sdk_s3::Client,
        config: AwsStoreConfig,
    ) -> Self {
        Self {
            dynamo,
            s3,
            config,
        }
    }

    fn object_key(&self, key: &FragmentKey) -> String {
        self.config.object_key(&key.owner_id, &key.id)
    }
}

#[async_trait]
impl FragmentStore for AwsFragmentStore {
    #[instrument(skip(self, record), fields(key = %FragmentKey::of(record)))]
    async fn write_fragment(&self, record: &FragmentRecord) -> Result<(), StoreError> {
        self.dynamo
            .put_item()
            .table_name(&self.config.table_name)
            .set_item(Some(item::to_item(record)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn read_fragment(&self, key: &FragmentKey) -> Result<Option<FragmentRecord>, StoreError> {
        let result = self
            .dynamo
            .get_item()
            .table_name(&self.config.table_name)
            .key(OWNER_ID, AttributeValue::S(key.owner_id.to_string()))
            .key(ID, AttributeValue::S(key.id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        result.item().map(item::from_item).transpose()
    }

    #[instrument(skip(self, data), fields(key = %key, size = data.len()))]
    async fn write_fragment_data(&self, key: &FragmentKey, data: Bytes) -> Result<(), StoreError> {
        self.s3
            .put_object()
            .bucket(&self.config.bucket)
            .key(self.object_key(key))
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn read_fragment_data(&self, key: &FragmentKey) -> Result<Option<Bytes>, StoreError> {
        let result = self
            .s3
            .get_object()
            .bucket(&self.config.bucket)
            .key(self.object_key(key))
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(StoreError::Backend(service_err.to_string()));
            }
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Some(body.into_bytes()))
    }

    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn list_fragments(
        &self,
        owner_id: &OwnerId,
        expand: bool,
    ) -> Result<FragmentListing, StoreError> {
        let mut records = Vec::new();
        let mut ids = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let mut query = self
                .dynamo
                .query()
                .table_name(&self.config.table_name)
                .key_condition_expression("#owner = :owner")
                .expression_attribute_names("#owner", OWNER_ID)
                .expression_attribute_values(":owner", AttributeValue::S(owner_id.to_string()))
                .consistent_read(true);

            if !expand {
                query = query
                    .projection_expression("#id")
                    .expression_attribute_names("#id", ID);
            }

            if let Some(key) = exclusive_start_key {
                query = query.set_exclusive_start_key(Some(key));
            }

            let response = query
                .send()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            for entry in response.items() {
                if expand {
                    records.push(item::from_item(entry)?);
                } else {
                    ids.push(item::string_attr(entry, ID)?.to_owned());
                }
            }

            exclusive_start_key = response.last_evaluated_key().cloned();
            if exclusive_start_key.is_none() {
                break;
            }
        }

        // Items come back ordered by the sort key.
        Ok(if expand {
            FragmentListing::Records(records)
        } else {
            FragmentListing::Ids(ids)
        })
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn delete_fragment(&self, key: &FragmentKey) -> Result<bool, StoreError> {
        let deleted = self
            .dynamo
            .delete_item()
            .table_name(&self.config.table_name)
            .key(OWNER_ID, AttributeValue::S(key.owner_id.to_string()))
            .key(ID, AttributeValue::S(key.id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // S3 deletes succeed whether or not the object exists.
        self.s3
            .delete_object()
            .bucket(&self.config.bucket)
            .key(self.object_key(key))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let existed = deleted.attributes().is_some_and(|attrs| !attrs.is_empty());
        debug!(existed, "deleted fragment");
        Ok(existed)
    }
}
