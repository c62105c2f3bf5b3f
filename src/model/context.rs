//! Per-item processing context threaded through the pipeline.
//!
//! Each stage takes a `ProcessingContext` by value and returns the next one.
//! Nothing is shared between items and no stage keeps a reference past its
//! own call.

use super::item::BatchWriteItem;
use super::record::StoredRecord;
use super::status::ProcessingStatus;

/// Accumulated state for one batch item.
///
/// Transition methods consume the context and hand back a new value. Once the
/// status is terminal every transition is a no-op, so a stage that runs after
/// a failure cannot overwrite the outcome.
///
/// ## Example
///
/// ```ignore
/// let ctx = ProcessingContext::new(item);
/// let ctx = ctx.fail(ProcessingStatus::FailedValidation, "transactionCategory field is required");
/// assert_eq!(ctx.status(), ProcessingStatus::FailedValidation);
///
/// // Later stages cannot change it.
/// let ctx = ctx.succeed();
/// assert_eq!(ctx.status(), ProcessingStatus::FailedValidation);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingContext {
    item: BatchWriteItem,
    status: ProcessingStatus,
    record: Option<StoredRecord>,
    error_message: Option<String>,
    existing_record: Option<StoredRecord>,
}

impl ProcessingContext {
    /// Start processing an item.
    pub fn new(item: BatchWriteItem) -> Self {
        Self {
            item,
            status: ProcessingStatus::NotSet,
            record: None,
            error_message: None,
            existing_record: None,
        }
    }

    /// The item as submitted.
    pub fn item(&self) -> &BatchWriteItem {
        &self.item
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The derived record, once the mapping stage has produced one.
    pub fn record(&self) -> Option<&StoredRecord> {
        self.record.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The record already occupying this key, captured on a conditional-check failure.
    pub fn existing_record(&self) -> Option<&StoredRecord> {
        self.existing_record.as_ref()
    }

    /// Attach the derived record.
    pub fn with_record(self, record: StoredRecord) -> Self {
        if self.is_terminal() {
            return self;
        }
        Self {
            record: Some(record),
            ..self
        }
    }

    /// Mark the item failed with `status` and a human-readable reason.
    pub fn fail(self, status: ProcessingStatus, message: impl Into<String>) -> Self {
        debug_assert!(
            status.is_terminal() && !status.is_success(),
            "fail() called with non-failure status {status}"
        );
        self.terminate(status, Some(message.into()), None)
    }

    /// Mark the item rejected by the conditional write, keeping the record that
    /// already holds the key when the store returned one.
    pub fn conflict(self, message: impl Into<String>, existing: Option<StoredRecord>) -> Self {
        self.terminate(
            ProcessingStatus::FailedConditionalCheck,
            Some(message.into()),
            existing,
        )
    }

    /// Mark the item written.
    pub fn succeed(self) -> Self {
        self.terminate(ProcessingStatus::SuccessfullyPutItem, None, None)
    }

    fn terminate(
        self,
        status: ProcessingStatus,
        error_message: Option<String>,
        existing_record: Option<StoredRecord>,
    ) -> Self {
        if self.is_terminal() {
            return self;
        }
        Self {
            status,
            error_message,
            existing_record,
            ..self
        }
    }
}
