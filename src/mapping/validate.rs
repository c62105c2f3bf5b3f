//! Required-field checks.

use crate::model::BatchWriteItem;

/// A [`BatchWriteItem`] whose required fields are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedItem<'a> {
    pub item: &'a BatchWriteItem,
    pub account_reference_id: &'a str,
    pub transaction_category: &'a str,
    pub transaction_effective_date: &'a str,
    pub posted_transaction_event_order_id: i32,
    pub posted_transaction_sequence_number: i32,
    pub financial_core_command_id: &'a str,
    pub financial_core_command_id_source: &'a str,
}

/// Check required fields in their fixed order, stopping at the first gap.
///
/// The error is the reason reported back to the caller,
/// e.g. `"transactionCategory field is required"`.
pub fn check_required(item: &BatchWriteItem) -> Result<ValidatedItem<'_>, String> {
    let account_reference_id = required_str("accountReferenceId", &item.account_reference_id)?;
    let transaction_category = required_str("transactionCategory", &item.transaction_category)?;
    let transaction_effective_date =
        required_str("transactionEffectiveDate", &item.transaction_effective_date)?;
    let posted_transaction_event_order_id = required(
        "postedTransactionEventOrderId",
        item.posted_transaction_event_order_id,
    )?;
    let posted_transaction_sequence_number = required(
        "postedTransactionSequenceNumber",
        item.posted_transaction_sequence_number,
    )?;
    let financial_core_command_id =
        required_str("financialCoreCommandId", &item.financial_core_command_id)?;
    let financial_core_command_id_source = required_str(
        "financialCoreCommandIdSource",
        &item.financial_core_command_id_source,
    )?;

    Ok(ValidatedItem {
        item,
        account_reference_id,
        transaction_category,
        transaction_effective_date,
        posted_transaction_event_order_id,
        posted_transaction_sequence_number,
        financial_core_command_id,
        financial_core_command_id_source,
    })
}

fn required_str<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, String> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, String> {
    value.ok_or_else(|| missing(field))
}

fn missing(field: &str) -> String {
    format!("{field} field is required")
}
