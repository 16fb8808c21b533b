use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};

use fragments_store::error::StoreError;

use crate::item::{ID, OWNER_ID};

fn build_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("invalid table definition: {e}"))
}

/// Create the fragments metadata table programmatically.
///
/// The table uses a composite primary key with:
/// - `ownerId` (String) as the partition key
/// - `id` (String) as the sort key
///
/// This is intended for tests and local development. In production you would
/// typically provision the table via Infrastructure-as-Code tooling.
///
/// # Errors
///
/// Returns an error if the `CreateTable` call fails for reasons other than
/// the table already existing.
pub async fn create_table(client: &Client, table_name: &str) -> Result<(), StoreError> {
    let result = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(OWNER_ID)
                .key_type(KeyType::Hash)
                .build()
                .map_err(build_error)?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(ID)
                .key_type(KeyType::Range)
                .build()
                .map_err(build_error)?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(OWNER_ID)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(build_error)?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(ID)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(build_error)?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            // Tolerate "table already exists" errors so `create_table` is idempotent.
            let service_err = err.into_service_error();
            if service_err.is_resource_in_use_exception() {
                Ok(())
            } else {
                Err(StoreError::Backend(service_err.to_string()))
            }
        }
    }
}
