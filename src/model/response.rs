//! Batch-write response types.

use serde::{Deserialize, Serialize};

use super::record::StoredRecord;

/// Batch-level outcome category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    AllItemsProcessedSuccessfully,
    AllItemsFailedValidation,
    AllItemsFailedConditionalCheck,
    /// Every item failed against the backend (put or get).
    AllItemsFailedPutItem,
    PartialItemsProcessedSuccessfully,
    /// A mix of failure kinds and no successes.
    UnknownErrors,
}

impl ResponseType {
    /// HTTP status the category is reported with.
    pub fn status_code(self) -> u16 {
        match self {
            ResponseType::AllItemsProcessedSuccessfully => 200,
            ResponseType::AllItemsFailedValidation => 400,
            ResponseType::AllItemsFailedConditionalCheck => 409,
            ResponseType::AllItemsFailedPutItem => 500,
            ResponseType::PartialItemsProcessedSuccessfully => 207,
            ResponseType::UnknownErrors => 500,
        }
    }
}

/// One entry in the failure list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWriteFailedItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_reference_id: Option<String>,
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The record that already holds the key, for conditional-check failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_item: Option<StoredRecord>,
}

/// Result of a batch write.
///
/// `total_written + failed_count == total_sent` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWriteResponse {
    pub total_sent: usize,
    pub total_written: usize,
    pub failed_count: usize,
    pub response_type: ResponseType,
    /// Present only when at least one item failed, in input order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_items: Option<Vec<BatchWriteFailedItem>>,
}

impl BatchWriteResponse {
    pub fn status_code(&self) -> u16 {
        self.response_type.status_code()
    }
}
