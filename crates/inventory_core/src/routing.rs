use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::contract::{
    record_key, validate_product_id, ApiGatewayRequest, DeleteProductRequest, Record,
    UpdateProductRequest, HEALTH_PATH, PRODUCTS_PATH, PRODUCT_KEY_FIELD, PRODUCT_PATH,
};
use crate::error::ApiError;

/// A request resolved to one of the six supported operations, parameters already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Health,
    GetProduct {
        product_id: String,
    },
    ListProducts,
    SaveProduct {
        item: Record,
    },
    UpdateProduct {
        product_id: String,
        update_key: String,
        update_value: Value,
    },
    DeleteProduct {
        product_id: String,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::GetProduct { .. } => "get_product",
            Self::ListProducts => "list_products",
            Self::SaveProduct { .. } => "save_product",
            Self::UpdateProduct { .. } => "update_product",
            Self::DeleteProduct { .. } => "delete_product",
        }
    }
}

pub fn resolve_operation(request: &ApiGatewayRequest) -> Result<Operation, ApiError> {
    let method = request.http_method.trim().to_ascii_uppercase();
    let path = normalize_path(&request.path);

    match (method.as_str(), path) {
        ("GET", HEALTH_PATH) => Ok(Operation::Health),
        ("GET", PRODUCT_PATH) => {
            let product_id = request.query_parameter(PRODUCT_KEY_FIELD).ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "Query parameter '{PRODUCT_KEY_FIELD}' is required"
                ))
            })?;
            Ok(Operation::GetProduct {
                product_id: validate_product_id(product_id)?.to_string(),
            })
        }
        ("GET", PRODUCTS_PATH) => Ok(Operation::ListProducts),
        ("POST", PRODUCT_PATH) => {
            let item = match parse_body::<Value>(request)? {
                Value::Object(item) => item,
                _ => {
                    return Err(ApiError::BadRequest(
                        "Request body must be a JSON object".to_string(),
                    ))
                }
            };
            record_key(&item)?;
            Ok(Operation::SaveProduct { item })
        }
        ("PATCH", PRODUCT_PATH) => {
            let body = parse_body::<UpdateProductRequest>(request)?;
            validate_product_id(&body.product_id)?;
            if body.update_key.trim().is_empty() {
                return Err(ApiError::BadRequest("updateKey cannot be empty".to_string()));
            }
            if body.update_key == PRODUCT_KEY_FIELD {
                return Err(ApiError::BadRequest(format!(
                    "{PRODUCT_KEY_FIELD} cannot be updated"
                )));
            }
            Ok(Operation::UpdateProduct {
                product_id: body.product_id,
                update_key: body.update_key,
                update_value: body.update_value,
            })
        }
        ("DELETE", PRODUCT_PATH) => {
            let body = parse_body::<DeleteProductRequest>(request)?;
            validate_product_id(&body.product_id)?;
            Ok(Operation::DeleteProduct {
                product_id: body.product_id,
            })
        }
        _ => Err(ApiError::BadRequest(format!(
            "No route for {method} {}",
            request.path
        ))),
    }
}

fn normalize_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

fn parse_body<T: DeserializeOwned>(request: &ApiGatewayRequest) -> Result<T, ApiError> {
    let text = decode_body(request)?;
    serde_json::from_str(&text)
        .map_err(|error| ApiError::BadRequest(format!("Malformed JSON body: {error}")))
}

fn decode_body(request: &ApiGatewayRequest) -> Result<String, ApiError> {
    let body = match request.body.as_deref() {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Err(ApiError::BadRequest("Request body is required".to_string())),
    };

    if !request.is_base64_encoded {
        return Ok(body.to_string());
    }

    let bytes = BASE64
        .decode(body.trim())
        .map_err(|error| ApiError::BadRequest(format!("Malformed base64 body: {error}")))?;
    String::from_utf8(bytes)
        .map_err(|error| ApiError::BadRequest(format!("Request body is not UTF-8: {error}")))
}
