use tracing::{error, info, warn};

use crate::model::{ProcessingContext, ProcessingStatus};
use crate::store::{PutOutcome, TransactionStore};

/// Conditionally insert the item's record.
pub async fn put_record(ctx: ProcessingContext, store: &dyn TransactionStore) -> ProcessingContext {
    if ctx.is_terminal() {
        return ctx;
    }
    let Some(record) = ctx.record() else {
        return ctx;
    };

    let result = store.put_if_absent(record).await;
    let partition = record.account_partition.clone();
    let order_key = record.order_key.clone();

    match result {
        Ok(PutOutcome::Inserted) => {
            info!(account_partition = %partition, order_key = %order_key, "transaction stored");
            ctx.succeed()
        }
        Ok(PutOutcome::Conflict(existing)) => {
            let message = format!(
                "Conditional check failed for AccountPartition: {partition}, OrderKey: {order_key}"
            );
            warn!("{message}");
            ctx.conflict(message, existing)
        }
        Err(e) => {
            let message = format!(
                "Error putting item in transaction store: AccountPartition: {partition}, OrderKey: {order_key}, ErrorMessage: {e}"
            );
            error!("{message}");
            ctx.fail(ProcessingStatus::FailedPutItem, message)
        }
    }
}
