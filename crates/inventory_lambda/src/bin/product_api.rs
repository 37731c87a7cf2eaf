use inventory_lambda::adapters::dynamodb::{create_client, DynamoDbProductStore};
use inventory_lambda::config::ApiConfig;
use inventory_lambda::handlers::api::{handle_api_event, ApiGatewayResponse};
use inventory_lambda::observability::{init_tracing, LogFormat};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &DynamoDbProductStore,
    config: &ApiConfig,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_api_event(event.payload, store, config))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing(LogFormat::from_env());

    let config = ApiConfig::from_env().map_err(|error| Error::from(error.to_string()))?;
    tracing::info!(
        table = %config.table_name,
        scan_page_limit = ?config.scan_page_limit,
        local_endpoint = config.endpoint_url.is_some(),
        "product api starting"
    );

    let store = DynamoDbProductStore::new(create_client(&config).await, config.scan_page_limit);
    let store = &store;
    let config = &config;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, store, config).await
    }))
    .await
}
