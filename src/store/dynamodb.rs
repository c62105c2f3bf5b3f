//! DynamoDB-backed stores.
//!
//! Record attributes use the same camelCase names as the JSON form of
//! [`StoredRecord`]. Numbers are `N`, everything else is `S`; absent optional
//! fields are left out of the item. Reads also accept a binary `event` and a
//! missing `sortKey`.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValuesOnConditionCheckFailure};
use aws_sdk_dynamodb::Client;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::{ProvisionKey, ProvisionRecord, ProvisionStore, PutOutcome, TransactionStore};
use crate::error::StoreError;
use crate::mapping::sort_key;
use crate::model::StoredRecord;

type Item = HashMap<String, AttributeValue>;

const PUT_CONDITION: &str =
    "attribute_not_exists(accountPartition) AND attribute_not_exists(orderKey)";

/// Build a client for `region`, optionally pointed at a local endpoint.
#[instrument(skip(endpoint_url))]
pub async fn connect(region: &str, endpoint_url: Option<&str>) -> Client {
    let mut config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(endpoint) = endpoint_url {
        config_builder = config_builder.endpoint_url(endpoint);
    }

    let config = config_builder.load().await;
    debug!(region, "DynamoDB client configured");
    Client::new(&config)
}

/// Conditional-put transaction store.
#[derive(Clone)]
pub struct DynamoDbTransactionStore {
    client: Client,
    table_name: String,
}

impl DynamoDbTransactionStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TransactionStore for DynamoDbTransactionStore {
    #[instrument(skip(self, record), fields(table = %self.table_name))]
    async fn put_if_absent(&self, record: &StoredRecord) -> Result<PutOutcome, StoreError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .condition_expression(PUT_CONDITION)
            .return_values_on_condition_check_failure(ReturnValuesOnConditionCheckFailure::AllOld)
            .send()
            .await;

        match result {
            Ok(_) => Ok(PutOutcome::Inserted),
            Err(err) => {
                let message = DisplayErrorContext(&err).to_string();
                match err.into_service_error() {
                    PutItemError::ConditionalCheckFailedException(e) => {
                        Ok(conflict_outcome(e.item()))
                    }
                    _ => Err(StoreError::Backend(message)),
                }
            }
        }
    }
}

/// Account-table provision lookups.
#[derive(Clone)]
pub struct DynamoDbProvisionStore {
    client: Client,
    table_name: String,
}

impl DynamoDbProvisionStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl ProvisionStore for DynamoDbProvisionStore {
    #[instrument(skip(self, key), fields(table = %self.table_name))]
    async fn get_provision(
        &self,
        key: &ProvisionKey,
    ) -> Result<Option<ProvisionRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("contractId", AttributeValue::S(key.contract_id.clone()))
            .key(
                "postedTransactionSequenceNumber",
                AttributeValue::N(key.posted_transaction_sequence_number.to_string()),
            )
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;

        Ok(output.item().map(|item| ProvisionRecord {
            key: key.clone(),
            attributes: item_to_json(item),
        }))
    }
}

// ============================================================================
// Attribute mapping
// ============================================================================

fn record_to_item(record: &StoredRecord) -> Item {
    let mut item = Item::new();
    let mut put_s = |name: &str, value: &str| {
        item.insert(name.to_string(), AttributeValue::S(value.to_string()));
    };

    put_s("accountPartition", &record.account_partition);
    put_s("orderKey", &record.order_key);
    put_s("sortKey", &record.sort_key);
    put_s("commandKey", &record.command_key);
    put_s("contractId", &record.contract_id);
    put_s("event", &record.event);
    put_s("financialCoreCommandId", &record.financial_core_command_id);
    put_s(
        "financialCoreCommandIdSource",
        &record.financial_core_command_id_source,
    );
    put_s("transactionCategory", &record.transaction_category);
    put_s("transactionEffectiveDate", &record.transaction_effective_date);

    for (name, value) in [
        ("instrumentVersionId", &record.instrument_version_id),
        ("postedTransactionId", &record.posted_transaction_id),
        ("schemaReference", &record.schema_reference),
        ("transactionProcessingDate", &record.transaction_processing_date),
    ] {
        if let Some(value) = value {
            put_s(name, value);
        }
    }

    item.insert(
        "postedTransactionEventOrderId".into(),
        AttributeValue::N(record.posted_transaction_event_order_id.to_string()),
    );
    item.insert(
        "postedTransactionSequenceNumber".into(),
        AttributeValue::N(record.posted_transaction_sequence_number.to_string()),
    );
    item
}

/// A rejected put is a conflict whatever shape the existing item has.
fn conflict_outcome(existing: Option<&Item>) -> PutOutcome {
    let existing = existing.and_then(|item| match item_to_record(item) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "existing item could not be read back");
            None
        }
    });
    PutOutcome::Conflict(existing)
}

/// Older writers omit `sortKey` and store `event` as binary.
fn item_to_record(item: &Item) -> Result<StoredRecord, StoreError> {
    let posted_transaction_event_order_id = required_n(item, "postedTransactionEventOrderId")?;
    Ok(StoredRecord {
        account_partition: required_s(item, "accountPartition")?,
        order_key: required_s(item, "orderKey")?,
        sort_key: optional_s(item, "sortKey")
            .unwrap_or_else(|| sort_key(posted_transaction_event_order_id)),
        command_key: required_s(item, "commandKey")?,
        contract_id: required_s(item, "contractId")?,
        event: event_text(item),
        financial_core_command_id: required_s(item, "financialCoreCommandId")?,
        financial_core_command_id_source: required_s(item, "financialCoreCommandIdSource")?,
        instrument_version_id: optional_s(item, "instrumentVersionId"),
        posted_transaction_event_order_id,
        posted_transaction_id: optional_s(item, "postedTransactionId"),
        posted_transaction_sequence_number: required_n(item, "postedTransactionSequenceNumber")?,
        schema_reference: optional_s(item, "schemaReference"),
        transaction_category: required_s(item, "transactionCategory")?,
        transaction_effective_date: required_s(item, "transactionEffectiveDate")?,
        transaction_processing_date: optional_s(item, "transactionProcessingDate"),
    })
}

fn optional_s(item: &Item, name: &str) -> Option<String> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Base64 text whether the payload was stored as `S` or `B`.
fn event_text(item: &Item) -> String {
    match item.get("event") {
        Some(AttributeValue::S(s)) => s.clone(),
        Some(AttributeValue::B(blob)) => BASE64.encode(blob.as_ref()),
        _ => String::new(),
    }
}

fn required_s(item: &Item, name: &str) -> Result<String, StoreError> {
    optional_s(item, name).ok_or_else(|| StoreError::Malformed(format!("{name} missing")))
}

fn required_n(item: &Item, name: &str) -> Result<i32, StoreError> {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| StoreError::Malformed(format!("{name} missing")))?
        .parse()
        .map_err(|_| StoreError::Malformed(format!("{name} is not an i32")))
}

/// Scalar attributes only; nested and set values are skipped.
fn item_to_json(item: &Item) -> Map<String, Value> {
    item.iter()
        .filter_map(|(name, value)| {
            let json = match value {
                AttributeValue::S(s) => Value::String(s.clone()),
                AttributeValue::N(n) => n
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(n.clone())),
                AttributeValue::Bool(b) => Value::Bool(*b),
                AttributeValue::Null(_) => Value::Null,
                _ => return None,
            };
            Some((name.clone(), json))
        })
        .collect()
}
