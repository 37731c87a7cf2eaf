use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

pub const PRODUCT_KEY_FIELD: &str = "productId";
pub const DEFAULT_TABLE_NAME: &str = "product-inventory";

pub const HEALTH_PATH: &str = "/health";
pub const PRODUCT_PATH: &str = "/product";
pub const PRODUCTS_PATH: &str = "/products";

pub const SUCCESS_MESSAGE: &str = "SUCCESS";

/// A stored product: an open field map with `productId` as its unique key.
pub type Record = Map<String, Value>;

/// API Gateway REST proxy event, reduced to the fields the router reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiGatewayRequest {
    #[serde(rename = "httpMethod", default)]
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "queryStringParameters", default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
}

impl ApiGatewayRequest {
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|parameters| parameters.get(name))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_id: String,
    pub update_key: String,
    pub update_value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductRequest {
    pub product_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    Save,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductsResponse {
    pub products: Vec<Record>,
}

/// Body returned by the save and delete operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ItemResponse {
    pub operation: MutationKind,
    pub message: String,
    pub item: Record,
}

impl ItemResponse {
    pub fn saved(item: Record) -> Self {
        Self {
            operation: MutationKind::Save,
            message: SUCCESS_MESSAGE.to_string(),
            item,
        }
    }

    pub fn deleted(item: Record) -> Self {
        Self {
            operation: MutationKind::Delete,
            message: SUCCESS_MESSAGE.to_string(),
            item,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateResponse {
    pub operation: MutationKind,
    pub message: String,
    pub updated_attributes: Record,
}

impl UpdateResponse {
    pub fn updated(updated_attributes: Record) -> Self {
        Self {
            operation: MutationKind::Update,
            message: SUCCESS_MESSAGE.to_string(),
            updated_attributes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Returns the record's key, rejecting records without a non-empty string `productId`.
pub fn record_key(record: &Record) -> Result<&str, ApiError> {
    match record.get(PRODUCT_KEY_FIELD) {
        Some(Value::String(key)) => validate_product_id(key),
        Some(_) => Err(ApiError::BadRequest(format!(
            "{PRODUCT_KEY_FIELD} must be a string"
        ))),
        None => Err(ApiError::BadRequest(format!(
            "{PRODUCT_KEY_FIELD} is required"
        ))),
    }
}

pub fn validate_product_id(product_id: &str) -> Result<&str, ApiError> {
    if product_id.trim().is_empty() {
        return Err(ApiError::BadRequest(format!(
            "{PRODUCT_KEY_FIELD} cannot be empty"
        )));
    }
    Ok(product_id)
}
