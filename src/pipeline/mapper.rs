use tracing::debug;

use crate::mapping::{check_required, to_record};
use crate::model::{BatchWriteItem, ProcessingContext, ProcessingStatus, StoredRecord};
use crate::reference::{resolve, Decryptor};

/// Validate the item, resolve its account reference and derive its record.
///
/// Any failure here is a caller problem and ends the item with
/// `FAILED_VALIDATION`.
pub fn map_item(ctx: ProcessingContext, decryptor: &dyn Decryptor) -> ProcessingContext {
    if ctx.is_terminal() {
        return ctx;
    }

    let derived = derive_record(ctx.item(), decryptor);
    match derived {
        Ok(record) => ctx.with_record(record),
        Err(reason) => {
            debug!(reason = %reason, "item failed validation");
            ctx.fail(ProcessingStatus::FailedValidation, reason)
        }
    }
}

fn derive_record(item: &BatchWriteItem, decryptor: &dyn Decryptor) -> Result<StoredRecord, String> {
    let validated = check_required(item)?;
    let reference =
        resolve(decryptor, validated.account_reference_id).map_err(|e| e.to_string())?;
    to_record(&validated, &reference).map_err(|e| e.to_string())
}
