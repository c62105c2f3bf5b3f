use crate::model::{
    BatchWriteFailedItem, BatchWriteResponse, ProcessingContext, ProcessingStatus, ResponseType,
};

enum Predicate {
    /// Every status is one of these.
    All(&'static [ProcessingStatus]),
    /// At least one status equals this.
    Any(ProcessingStatus),
}

impl Predicate {
    fn matches(&self, statuses: &[ProcessingStatus]) -> bool {
        match self {
            Predicate::All(allowed) => statuses.iter().all(|s| allowed.contains(s)),
            Predicate::Any(wanted) => statuses.contains(wanted),
        }
    }
}

/// Evaluated in order; the first match wins.
const RULES: &[(Predicate, ResponseType)] = &[
    (
        Predicate::All(&[ProcessingStatus::SuccessfullyPutItem]),
        ResponseType::AllItemsProcessedSuccessfully,
    ),
    (
        Predicate::All(&[ProcessingStatus::FailedValidation]),
        ResponseType::AllItemsFailedValidation,
    ),
    (
        Predicate::All(&[ProcessingStatus::FailedConditionalCheck]),
        ResponseType::AllItemsFailedConditionalCheck,
    ),
    (
        Predicate::All(&[ProcessingStatus::FailedPutItem, ProcessingStatus::FailedGetItem]),
        ResponseType::AllItemsFailedPutItem,
    ),
    (
        Predicate::Any(ProcessingStatus::SuccessfullyPutItem),
        ResponseType::PartialItemsProcessedSuccessfully,
    ),
];

/// Pick the batch category for a set of item statuses.
///
/// An empty set counts as all-successful.
pub fn classify(statuses: &[ProcessingStatus]) -> ResponseType {
    RULES
        .iter()
        .find(|(predicate, _)| predicate.matches(statuses))
        .map(|(_, response_type)| *response_type)
        .unwrap_or(ResponseType::UnknownErrors)
}

/// Fold per-item results into the batch response.
///
/// Failed items keep the order of `contexts`.
pub fn aggregate(contexts: &[ProcessingContext]) -> BatchWriteResponse {
    let statuses: Vec<ProcessingStatus> = contexts.iter().map(|c| c.status()).collect();
    let total_written = statuses.iter().filter(|s| s.is_success()).count();

    let failed_items: Vec<BatchWriteFailedItem> = contexts
        .iter()
        .filter(|c| !c.status().is_success())
        .map(|c| BatchWriteFailedItem {
            account_reference_id: c.item().account_reference_id.clone(),
            error_code: c.status().status_code().to_string(),
            reason: c.error_message().map(str::to_string),
            existing_item: c.existing_record().cloned(),
        })
        .collect();

    BatchWriteResponse {
        total_sent: contexts.len(),
        total_written,
        failed_count: failed_items.len(),
        response_type: classify(&statuses),
        failed_items: (!failed_items.is_empty()).then_some(failed_items),
    }
}
