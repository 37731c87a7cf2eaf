//! In-memory store doubles shared by unit and integration tests.
//!
//! [`InMemoryProductStore`] pages its tables the way DynamoDB does: records
//! come back in key order, at most `page_size` per call, with the last key of
//! the page as continuation token whenever more records remain.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::contract::{Record, PRODUCT_KEY_FIELD};
use crate::error::StoreError;
use crate::store::{ContinuationToken, ProductStore, ScanPage};

type Table = BTreeMap<String, Record>;

pub struct InMemoryProductStore {
    tables: Mutex<BTreeMap<String, Table>>,
    page_size: usize,
    scan_calls: Mutex<usize>,
}

impl InMemoryProductStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            tables: Mutex::new(BTreeMap::new()),
            page_size: page_size.max(1),
            scan_calls: Mutex::new(0),
        }
    }

    /// Seeds `table` with `count` records keyed `product-000`, `product-001`, ...
    pub fn with_products(self, table: &str, count: usize) -> Self {
        for index in 0..count {
            let record = product_record(&format!("product-{index:03}"), index);
            self.insert(table, record);
        }
        self
    }

    /// Inserts a record, panicking when it has no string key.
    pub fn insert(&self, table: &str, record: Record) {
        let key = record
            .get(PRODUCT_KEY_FIELD)
            .and_then(Value::as_str)
            .expect("seeded record must have a string productId")
            .to_string();
        self.tables
            .lock()
            .expect("poisoned mutex")
            .entry(table.to_string())
            .or_default()
            .insert(key, record);
    }

    pub fn len(&self, table: &str) -> usize {
        self.tables
            .lock()
            .expect("poisoned mutex")
            .get(table)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    pub fn scan_calls(&self) -> usize {
        *self.scan_calls.lock().expect("poisoned mutex")
    }
}

impl ProductStore for InMemoryProductStore {
    fn get_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .tables
            .lock()
            .expect("poisoned mutex")
            .get(table)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError> {
        let key = record
            .get(PRODUCT_KEY_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StoreError::MalformedPayload(format!("record is missing {PRODUCT_KEY_FIELD}"))
            })?;
        self.tables
            .lock()
            .expect("poisoned mutex")
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), record.clone());
        Ok(())
    }

    fn update_field(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError> {
        let mut tables = self.tables.lock().expect("poisoned mutex");
        let Some(record) = tables.get_mut(table).and_then(|records| records.get_mut(key)) else {
            return Ok(None);
        };
        record.insert(field.to_string(), value.clone());

        let mut updated = Record::new();
        updated.insert(field.to_string(), value.clone());
        Ok(Some(updated))
    }

    fn delete_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .tables
            .lock()
            .expect("poisoned mutex")
            .get_mut(table)
            .and_then(|records| records.remove(key)))
    }

    fn scan_page(
        &self,
        table: &str,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        *self.scan_calls.lock().expect("poisoned mutex") += 1;

        let tables = self.tables.lock().expect("poisoned mutex");
        let Some(records) = tables.get(table) else {
            return Ok(ScanPage::default());
        };

        let start_key = start
            .and_then(|token| token.as_key().get(PRODUCT_KEY_FIELD))
            .and_then(Value::as_str);
        let remaining: Vec<(&String, &Record)> = match start_key {
            Some(after) => records
                .range::<str, _>((
                    std::ops::Bound::Excluded(after),
                    std::ops::Bound::Unbounded,
                ))
                .collect(),
            None => records.iter().collect(),
        };

        let page: Vec<Record> = remaining
            .iter()
            .take(self.page_size)
            .map(|(_, record)| (*record).clone())
            .collect();

        if remaining.len() > self.page_size {
            let (last_key, _) = remaining[self.page_size - 1];
            let mut key = Record::new();
            key.insert(
                PRODUCT_KEY_FIELD.to_string(),
                Value::String(last_key.clone()),
            );
            Ok(ScanPage::with_token(page, ContinuationToken::new(key)))
        } else {
            Ok(ScanPage::last(page))
        }
    }
}

pub fn product_record(product_id: &str, index: usize) -> Record {
    let mut record = Record::new();
    record.insert(
        PRODUCT_KEY_FIELD.to_string(),
        Value::String(product_id.to_string()),
    );
    record.insert("name".to_string(), Value::String(format!("Product {index}")));
    record.insert("quantity".to_string(), Value::from(index));
    record
}

pub fn token(key: &str) -> ContinuationToken {
    let mut record = Record::new();
    record.insert(PRODUCT_KEY_FIELD.to_string(), Value::String(key.to_string()));
    ContinuationToken::new(record)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn put_without_key_is_malformed_payload() {
        let store = InMemoryProductStore::new(10);
        let Value::Object(record) = json!({"name": "no key"}) else {
            unreachable!();
        };

        let error = store
            .put_record("products", &record)
            .expect_err("record without key should be rejected");

        assert!(matches!(error, StoreError::MalformedPayload(_)));
        assert!(store.is_empty("products"));
    }

    #[test]
    fn pages_end_with_token_only_while_records_remain() {
        let store = InMemoryProductStore::new(2).with_products("products", 3);

        let first = store.scan_page("products", None).expect("scan");
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.next_token, Some(token("product-001")));

        let second = store
            .scan_page("products", first.next_token.as_ref())
            .expect("scan");
        assert_eq!(second.records, vec![product_record("product-002", 2)]);
        assert_eq!(second.next_token, None);
        assert_eq!(store.scan_calls(), 2);
    }
}
