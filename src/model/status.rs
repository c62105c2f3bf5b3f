//! Per-item processing status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a batch item ended up after flowing through the pipeline.
///
/// `NotSet` is the only non-terminal state. Every other variant is final: once
/// a stage assigns it, no later stage may replace it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    /// Initial state.
    #[default]
    NotSet,
    /// A required field was missing, the reference could not be resolved,
    /// the payload could not be encoded, or no provision record exists.
    FailedValidation,
    /// The account store lookup errored.
    FailedGetItem,
    /// A record with the same partition and order key already exists.
    FailedConditionalCheck,
    /// The transaction store write errored.
    FailedPutItem,
    /// Written.
    SuccessfullyPutItem,
}

impl ProcessingStatus {
    /// Stable error code reported in failed-item entries.
    pub fn status_code(self) -> &'static str {
        match self {
            ProcessingStatus::NotSet => "",
            ProcessingStatus::FailedValidation => "failed_validation",
            ProcessingStatus::FailedGetItem => "failed_get_item",
            ProcessingStatus::FailedConditionalCheck => "failed_conditional_check",
            ProcessingStatus::FailedPutItem => "failed_put_item",
            ProcessingStatus::SuccessfullyPutItem => "success",
        }
    }

    /// True for every status except `NotSet`.
    pub fn is_terminal(self) -> bool {
        self != ProcessingStatus::NotSet
    }

    pub fn is_success(self) -> bool {
        self == ProcessingStatus::SuccessfullyPutItem
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingStatus::NotSet => "NOT_SET",
            ProcessingStatus::FailedValidation => "FAILED_VALIDATION",
            ProcessingStatus::FailedGetItem => "FAILED_GET_ITEM",
            ProcessingStatus::FailedConditionalCheck => "FAILED_CONDITIONAL_CHECK",
            ProcessingStatus::FailedPutItem => "FAILED_PUT_ITEM",
            ProcessingStatus::SuccessfullyPutItem => "SUCCESSFULLY_PUT_ITEM",
        };
        f.write_str(name)
    }
}
