//! Conversion between JSON records and DynamoDB attribute maps.
//!
//! Records stay schemaless JSON objects inside the service; this module is
//! the only place that knows the DynamoDB wire types. Binary attributes have
//! no JSON form and are reported as malformed payloads.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use inventory_core::contract::Record;
use inventory_core::error::StoreError;
use serde_json::{Number, Value};

pub type Item = HashMap<String, AttributeValue>;

pub fn record_to_item(record: &Record) -> Item {
    record
        .iter()
        .map(|(name, value)| (name.clone(), json_to_attribute(value)))
        .collect()
}

pub fn item_to_record(item: &Item) -> Result<Record, StoreError> {
    item.iter()
        .map(|(name, attribute)| {
            attribute_to_json(attribute)
                .map(|value| (name.clone(), value))
                .map_err(|error| match error {
                    StoreError::MalformedPayload(message) => {
                        StoreError::MalformedPayload(format!("attribute '{name}': {message}"))
                    }
                    other => other,
                })
        })
        .collect()
}

pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), json_to_attribute(value)))
                .collect(),
        ),
    }
}

pub fn attribute_to_json(attribute: &AttributeValue) -> Result<Value, StoreError> {
    match attribute {
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::N(text) => parse_number(text),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(values) => values
            .iter()
            .map(attribute_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(fields) => item_to_record(fields).map(Value::Object),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|text| parse_number(text))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::B(_) | AttributeValue::Bs(_) => Err(StoreError::MalformedPayload(
            "binary attributes are not supported".to_string(),
        )),
        _ => Err(StoreError::MalformedPayload(
            "unknown attribute type".to_string(),
        )),
    }
}

fn parse_number(text: &str) -> Result<Value, StoreError> {
    if let Ok(integer) = text.parse::<i64>() {
        return Ok(Value::from(integer));
    }
    if let Ok(unsigned) = text.parse::<u64>() {
        return Ok(Value::from(unsigned));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::MalformedPayload(format!("invalid number '{text}'")))
}
