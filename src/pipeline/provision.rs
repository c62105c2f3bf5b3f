use tracing::error;

use crate::model::{ProcessingContext, ProcessingStatus};
use crate::store::{ProvisionKey, ProvisionStore};

pub const NO_PROVISION_RECORD: &str = "No provision record found in account store";

/// Require a provisioning record for the item's contract.
///
/// A missing record is a validation failure; a failed lookup is `FAILED_GET_ITEM`.
pub async fn check_provision(
    ctx: ProcessingContext,
    store: &dyn ProvisionStore,
) -> ProcessingContext {
    if ctx.is_terminal() {
        return ctx;
    }
    let key = match ctx.record() {
        Some(record) => ProvisionKey::for_contract(record.contract_id.clone()),
        None => return ctx,
    };

    match store.get_provision(&key).await {
        Ok(Some(_)) => ctx,
        Ok(None) => {
            error!(
                posted_transaction_id = ?ctx.item().posted_transaction_id,
                "{NO_PROVISION_RECORD}"
            );
            ctx.fail(ProcessingStatus::FailedValidation, NO_PROVISION_RECORD)
        }
        Err(e) => {
            let message = format!("Error getting item from account store. ErrorMessage: {e}");
            error!(
                posted_transaction_id = ?ctx.item().posted_transaction_id,
                "{message}"
            );
            ctx.fail(ProcessingStatus::FailedGetItem, message)
        }
    }
}
