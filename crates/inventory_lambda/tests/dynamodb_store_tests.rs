//! `DynamoDbProductStore` against DynamoDB Local.
//!
//! Skipped unless `DYNAMODB_ENDPOINT_URL` is set, e.g.
//! ```bash
//! docker run -p 8000:8000 amazon/dynamodb-local -jar DynamoDBLocal.jar -inMemory
//! DYNAMODB_ENDPOINT_URL=http://localhost:8000 cargo test -p inventory_lambda --test dynamodb_store_tests
//! ```

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use inventory_core::contract::{Record, PRODUCT_KEY_FIELD};
use inventory_core::error::StoreError;
use inventory_core::scanner::{scan_all_records, ScanParams};
use inventory_core::store::{ContinuationToken, ProductStore, ScanPage};
use inventory_core::test_helpers::product_record;
use inventory_lambda::adapters::dynamodb::DynamoDbProductStore;
use inventory_lambda::config::ENDPOINT_URL_VAR;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const PAGE_LIMIT: i32 = 10;

fn dynamodb_endpoint() -> Option<String> {
    std::env::var(ENDPOINT_URL_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Client with static credentials; DynamoDB Local does not check them.
async fn local_client(endpoint: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .endpoint_url(endpoint)
        .region(aws_config::Region::new("us-east-1"))
        .credentials_provider(Credentials::new("local", "local", None, None, "local"))
        .load()
        .await;
    Client::new(&config)
}

/// Creates a fresh table per test so tests can run in parallel.
async fn create_table(client: &Client, prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    let table = format!("{prefix}-{nanos}");

    client
        .create_table()
        .table_name(&table)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(PRODUCT_KEY_FIELD)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .expect("attribute definition"),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(PRODUCT_KEY_FIELD)
                .key_type(KeyType::Hash)
                .build()
                .expect("key schema"),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .expect("table creation failed");
    table
}

async fn drop_table(client: &Client, table: &str) {
    let _ = client.delete_table().table_name(table).send().await;
}

/// Forwards to the wrapped store and counts scan pages.
struct CountingStore<'a> {
    inner: &'a DynamoDbProductStore,
    scan_calls: Mutex<usize>,
}

impl<'a> CountingStore<'a> {
    fn new(inner: &'a DynamoDbProductStore) -> Self {
        Self {
            inner,
            scan_calls: Mutex::new(0),
        }
    }

    fn scan_calls(&self) -> usize {
        *self.scan_calls.lock().expect("poisoned mutex")
    }
}

impl ProductStore for CountingStore<'_> {
    fn get_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        self.inner.get_by_key(table, key)
    }

    fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError> {
        self.inner.put_record(table, record)
    }

    fn update_field(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError> {
        self.inner.update_field(table, key, field, value)
    }

    fn delete_by_key(&self, table: &str, key: &str) -> Result<Option<Record>, StoreError> {
        self.inner.delete_by_key(table, key)
    }

    fn scan_page(
        &self,
        table: &str,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        *self.scan_calls.lock().expect("poisoned mutex") += 1;
        self.inner.scan_page(table, start)
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_follows_last_evaluated_key_across_pages() {
    let Some(endpoint) = dynamodb_endpoint() else {
        eprintln!("{ENDPOINT_URL_VAR} not set; skipping");
        return;
    };
    let client = local_client(&endpoint).await;
    let table = create_table(&client, "products-scan").await;
    let store = DynamoDbProductStore::new(client.clone(), Some(PAGE_LIMIT));

    let count = 25;
    for index in 0..count {
        store
            .put_record(&table, &product_record(&format!("product-{index:03}"), index))
            .expect("seed put failed");
    }

    let counting = CountingStore::new(&store);
    let records = scan_all_records(&counting, ScanParams::whole_table(&table), Vec::new())
        .expect("scan should succeed");

    let mut ids: Vec<String> = records
        .iter()
        .map(|record| record[PRODUCT_KEY_FIELD].as_str().expect("string key").to_string())
        .collect();
    ids.sort();
    let expected: Vec<String> = (0..count).map(|index| format!("product-{index:03}")).collect();
    assert_eq!(ids, expected);
    assert!(
        counting.scan_calls() >= 3,
        "expected at least 3 pages of {PAGE_LIMIT}, got {}",
        counting.scan_calls()
    );

    drop_table(&client, &table).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_key_creates_nothing() {
    let Some(endpoint) = dynamodb_endpoint() else {
        eprintln!("{ENDPOINT_URL_VAR} not set; skipping");
        return;
    };
    let client = local_client(&endpoint).await;
    let table = create_table(&client, "products-update").await;
    let store = DynamoDbProductStore::new(client.clone(), None);

    let updated = store
        .update_field(&table, "ghost", "color", &json!("green"))
        .expect("conditional failure is not an error");

    assert_eq!(updated, None);
    assert_eq!(store.get_by_key(&table, "ghost"), Ok(None));

    drop_table(&client, &table).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn update_of_existing_key_returns_updated_attribute() {
    let Some(endpoint) = dynamodb_endpoint() else {
        eprintln!("{ENDPOINT_URL_VAR} not set; skipping");
        return;
    };
    let client = local_client(&endpoint).await;
    let table = create_table(&client, "products-update").await;
    let store = DynamoDbProductStore::new(client.clone(), None);
    store
        .put_record(&table, &product_record("p-1", 1))
        .expect("seed put failed");

    let updated = store
        .update_field(&table, "p-1", "color", &json!("green"))
        .expect("update should succeed")
        .expect("record exists");

    assert_eq!(Value::Object(updated), json!({"color": "green"}));
    let stored = store
        .get_by_key(&table, "p-1")
        .expect("get should succeed")
        .expect("record exists");
    assert_eq!(stored["color"], "green");
    assert_eq!(stored["name"], "Product 1");

    drop_table(&client, &table).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn second_delete_observes_absence() {
    let Some(endpoint) = dynamodb_endpoint() else {
        eprintln!("{ENDPOINT_URL_VAR} not set; skipping");
        return;
    };
    let client = local_client(&endpoint).await;
    let table = create_table(&client, "products-delete").await;
    let store = DynamoDbProductStore::new(client.clone(), None);
    let record = product_record("p-1", 1);
    store.put_record(&table, &record).expect("seed put failed");

    let first = store.delete_by_key(&table, "p-1").expect("delete should succeed");
    let second = store.delete_by_key(&table, "p-1").expect("delete should succeed");

    assert_eq!(first, Some(record));
    assert_eq!(second, None);

    drop_table(&client, &table).await;
}
