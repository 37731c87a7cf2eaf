use inventory_core::contract::{ApiGatewayRequest, ItemResponse, ProductsResponse, UpdateResponse};
use inventory_core::error::ApiError;
use inventory_core::routing::{resolve_operation, Operation};
use inventory_core::scanner::{scan_all_records, ScanParams};
use inventory_core::store::ProductStore;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Entry point for a raw API Gateway proxy event.
///
/// Every outcome, including malformed events and store failures, becomes a
/// status-coded response; this function never fails.
pub fn handle_api_event(
    event: Value,
    store: &dyn ProductStore,
    config: &ApiConfig,
) -> ApiGatewayResponse {
    match serde_json::from_value::<ApiGatewayRequest>(event) {
        Ok(request) => handle_api_request(&request, store, &config.table_name),
        Err(error) => {
            let error = ApiError::BadRequest(format!("Malformed request event: {error}"));
            warn!(error = %error, "rejected request event");
            error_response(&error)
        }
    }
}

#[tracing::instrument(
    skip_all,
    fields(method = %request.http_method, path = %request.path)
)]
pub fn handle_api_request(
    request: &ApiGatewayRequest,
    store: &dyn ProductStore,
    table_name: &str,
) -> ApiGatewayResponse {
    debug!("request received");

    let operation = match resolve_operation(request) {
        Ok(value) => value,
        Err(error) => {
            warn!(status_code = error.status_code(), error = %error, "request rejected");
            return error_response(&error);
        }
    };

    match execute_operation(&operation, store, table_name) {
        Ok(response) => {
            info!(
                operation = operation.name(),
                status_code = response.status_code,
                "request completed"
            );
            response
        }
        Err(api_error) => {
            if api_error.is_server_error() {
                error!(
                    operation = operation.name(),
                    status_code = api_error.status_code(),
                    error = %api_error,
                    "request failed"
                );
            } else {
                warn!(
                    operation = operation.name(),
                    status_code = api_error.status_code(),
                    error = %api_error,
                    "request failed"
                );
            }
            error_response(&api_error)
        }
    }
}

fn execute_operation(
    operation: &Operation,
    store: &dyn ProductStore,
    table_name: &str,
) -> Result<ApiGatewayResponse, ApiError> {
    match operation {
        Operation::Health => Ok(empty_response(200)),
        Operation::GetProduct { product_id } => {
            let record = store
                .get_by_key(table_name, product_id)?
                .ok_or_else(|| missing_product(product_id))?;
            Ok(success_response(200, &record))
        }
        Operation::ListProducts => {
            let products =
                scan_all_records(store, ScanParams::whole_table(table_name), Vec::new())?;
            info!(records = products.len(), "products listed");
            Ok(success_response(200, &ProductsResponse { products }))
        }
        Operation::SaveProduct { item } => {
            store.put_record(table_name, item)?;
            Ok(success_response(200, &ItemResponse::saved(item.clone())))
        }
        Operation::UpdateProduct {
            product_id,
            update_key,
            update_value,
        } => {
            let updated = store
                .update_field(table_name, product_id, update_key, update_value)?
                .ok_or_else(|| missing_product(product_id))?;
            Ok(success_response(200, &UpdateResponse::updated(updated)))
        }
        Operation::DeleteProduct { product_id } => {
            let deleted = store
                .delete_by_key(table_name, product_id)?
                .ok_or_else(|| missing_product(product_id))?;
            Ok(success_response(200, &ItemResponse::deleted(deleted)))
        }
    }
}

fn missing_product(product_id: &str) -> ApiError {
    ApiError::NotFound(format!("Product '{product_id}' does not exist"))
}

fn json_headers() -> Value {
    json!({"Content-Type": "application/json"})
}

fn empty_response(status_code: u16) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json_headers(),
        body: String::new(),
    }
}

fn success_response(status_code: u16, payload: &impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json_headers(),
            body,
        },
        Err(serialization_error) => {
            error!(error = %serialization_error, "failed to serialize response");
            ApiGatewayResponse {
                status_code: 500,
                headers: json_headers(),
                body: json!({
                    "error": "serialization_error",
                    "message": serialization_error.to_string(),
                })
                .to_string(),
            }
        }
    }
}

fn error_response(error: &ApiError) -> ApiGatewayResponse {
    let body = error.to_body();
    ApiGatewayResponse {
        status_code: error.status_code(),
        headers: json_headers(),
        body: json!({
            "error": body.error,
            "message": body.message,
        })
        .to_string(),
    }
}
