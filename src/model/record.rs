//! The durable transaction record.

use serde::{Deserialize, Serialize};

/// An immutable posted-transaction record as persisted in the transaction store.
///
/// `(account_partition, order_key)` identifies a record; the store accepts at
/// most one write per pair and never updates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    /// `contractId ~ transactionCategory`.
    pub account_partition: String,
    /// `effectiveDate ~ encodedSequence _`.
    pub order_key: String,
    /// Event-order id, zero-padded to six digits.
    pub sort_key: String,
    /// `commandId ~ commandIdSource`.
    pub command_key: String,
    pub contract_id: String,
    /// Base64 text of the zlib-compressed event JSON; empty for no payload.
    pub event: String,
    pub financial_core_command_id: String,
    pub financial_core_command_id_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument_version_id: Option<String>,
    pub posted_transaction_event_order_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_transaction_id: Option<String>,
    pub posted_transaction_sequence_number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_reference: Option<String>,
    pub transaction_category: String,
    pub transaction_effective_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_processing_date: Option<String>,
}

impl StoredRecord {
    /// The uniqueness key enforced by the conditional write.
    pub fn key(&self) -> (&str, &str) {
        (&self.account_partition, &self.order_key)
    }
}
