use std::future::Future;

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use inventory_core::contract::{Record, PRODUCT_KEY_FIELD};
use inventory_core::error::StoreError;
use inventory_core::store::{ContinuationToken, ProductStore, ScanPage};
use serde_json::Value;

use crate::adapters::attribute_value::{item_to_record, json_to_attribute, record_to_item};
use crate::config::ApiConfig;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Builds a DynamoDB client from the default credential chain.
///
/// The region comes from the environment when set and falls back to
/// [`DEFAULT_REGION`]. `DYNAMODB_ENDPOINT_URL` points the client at
/// DynamoDB Local.
pub async fn create_client(config: &ApiConfig) -> Client {
    let region = RegionProviderChain::default_provider().or_else(Region::new(DEFAULT_REGION));
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    Client::new(&loader.load().await)
}

/// [`ProductStore`] backed by a DynamoDB table keyed on `productId`.
///
/// The store trait is synchronous; each call blocks the current worker on
/// the SDK future, which requires the multi-threaded Tokio runtime.
pub struct DynamoDbProductStore {
    client: Client,
    page_limit: Option<i32>,
}

impl DynamoDbProductStore {
    pub fn new(client: Client, page_limit: Option<i32>) -> Self {
        Self { client, page_limit }
    }
}

impl ProductStore for DynamoDbProductStore {
    #[tracing::instrument(skip(self), level = "debug")]
    fn get_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        let output = block_on(
            self.client
                .get_item()
                .table_name(table)
                .key(PRODUCT_KEY_FIELD, product_key(key))
                .send(),
        )
        .map_err(|error| unavailable("get item", table, error))?;

        output.item().map(item_to_record).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%table))]
    fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError> {
        block_on(
            self.client
                .put_item()
                .table_name(table)
                .set_item(Some(record_to_item(record)))
                .send(),
        )
        .map_err(|error| unavailable("put item", table, error))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, value), level = "debug")]
    fn update_field(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError> {
        let result = block_on(
            self.client
                .update_item()
                .table_name(table)
                .key(PRODUCT_KEY_FIELD, product_key(key))
                .update_expression("SET #field = :value")
                .condition_expression("attribute_exists(#key)")
                .expression_attribute_names("#field", field)
                .expression_attribute_names("#key", PRODUCT_KEY_FIELD)
                .expression_attribute_values(":value", json_to_attribute(value))
                .return_values(ReturnValue::UpdatedNew)
                .send(),
        );

        match result {
            Ok(output) => output
                .attributes()
                .map(item_to_record)
                .transpose()
                .map(|updated| Some(updated.unwrap_or_default())),
            Err(error)
                if error
                    .as_service_error()
                    .map(|service_error| service_error.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                Ok(None)
            }
            Err(error) => Err(unavailable("update item", table, error)),
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    fn delete_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        let output = block_on(
            self.client
                .delete_item()
                .table_name(table)
                .key(PRODUCT_KEY_FIELD, product_key(key))
                .return_values(ReturnValue::AllOld)
                .send(),
        )
        .map_err(|error| unavailable("delete item", table, error))?;

        output.attributes().map(item_to_record).transpose()
    }

    #[tracing::instrument(skip(self, start), level = "debug", fields(resumed = start.is_some()))]
    fn scan_page(
        &self,
        table: &str,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        let output = block_on(
            self.client
                .scan()
                .table_name(table)
                .set_limit(self.page_limit)
                .set_exclusive_start_key(start.map(|token| record_to_item(token.as_key())))
                .send(),
        )
        .map_err(|error| unavailable("scan", table, error))?;

        let records = output
            .items()
            .iter()
            .map(item_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        let next_token = output
            .last_evaluated_key()
            .map(item_to_record)
            .transpose()?
            .map(ContinuationToken::new);

        Ok(ScanPage {
            records,
            next_token,
        })
    }
}

fn product_key(key: &str) -> AttributeValue {
    AttributeValue::S(key.to_string())
}

fn unavailable(action: &str, table: &str, error: impl std::error::Error) -> StoreError {
    StoreError::Unavailable(format!(
        "failed to {action} in table '{table}': {}",
        DisplayErrorContext(error)
    ))
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
