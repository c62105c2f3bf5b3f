//! Inbound batch-write request types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One caller-submitted posted-transaction event.
///
/// Every field is optional on the wire; presence of the required ones is
/// checked by [`crate::mapping::validate`] so that a bad item fails on its own
/// instead of rejecting the whole request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWriteItem {
    /// Encrypted, base64-encoded account reference.
    #[serde(default)]
    pub account_reference_id: Option<String>,
    #[serde(default)]
    pub posted_transaction_id: Option<String>,
    #[serde(default)]
    pub financial_core_command_id: Option<String>,
    #[serde(default)]
    pub financial_core_command_id_source: Option<String>,
    #[serde(default)]
    pub transaction_effective_date: Option<String>,
    #[serde(default)]
    pub transaction_category: Option<String>,
    #[serde(default)]
    pub transaction_processing_date: Option<String>,
    /// Signed; negative values are legal and order before zero.
    #[serde(default)]
    pub posted_transaction_sequence_number: Option<i32>,
    #[serde(default)]
    pub posted_transaction_event_order_id: Option<i32>,
    #[serde(default)]
    pub schema_reference: Option<String>,
    #[serde(default)]
    pub instrument_version_id: Option<String>,
    /// Arbitrary event payload, stored compressed.
    #[serde(default)]
    pub event: Option<Value>,
}

/// Request body of the batch-write endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWriteRequest {
    #[serde(default)]
    pub transactions: Option<Vec<BatchWriteItem>>,
}
