use serde_json::Value;

use crate::contract::Record;
use crate::error::StoreError;

/// Opaque resume point handed out by the store when a scan has more pages.
///
/// For DynamoDB this is the `LastEvaluatedKey` key map.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken(Record);

impl ContinuationToken {
    pub fn new(key: Record) -> Self {
        Self(key)
    }

    pub fn as_key(&self) -> &Record {
        &self.0
    }
}

/// One page-bounded scan result. A missing `next_token` is the only end-of-table signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub records: Vec<Record>,
    pub next_token: Option<ContinuationToken>,
}

impl ScanPage {
    pub fn last(records: Vec<Record>) -> Self {
        Self {
            records,
            next_token: None,
        }
    }

    pub fn with_token(records: Vec<Record>, next_token: ContinuationToken) -> Self {
        Self {
            records,
            next_token: Some(next_token),
        }
    }
}

pub trait ProductStore {
    fn get_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError>;

    /// Stores `record`, overwriting any record with the same key.
    fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError>;

    /// Sets one field on an existing record and returns the updated attributes.
    /// Returns `Ok(None)` when no record has `key`.
    fn update_field(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError>;

    /// Removes the record and returns its prior state, or `Ok(None)` when absent.
    fn delete_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError>;

    fn scan_page(
        &self,
        table: &str,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError>;
}
