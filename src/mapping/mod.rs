//! Batch item → stored record mapping.
//!
//! - [`validate`]: required-field checks, first failure wins.
//! - [`keys`]: partition, order, sort and command key derivation.
//! - [`event`]: payload compression and its inverse.
//!
//! [`to_record`] ties them together and is a pure function of its inputs.

pub mod event;
pub mod keys;
pub mod validate;

use thiserror::Error;

use crate::model::StoredRecord;
use crate::reference::ReferenceId;

pub use event::{canonical_text, compress_event, inflate_event};
pub use keys::{
    command_key, decode_sequence, encode_sequence, order_key, partition_key, sort_key,
};
pub use validate::{check_required, ValidatedItem};

/// Payload encoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("event cannot be serialized: {0}")]
    Serialize(String),

    #[error("event cannot be compressed: {0}")]
    Compress(String),

    #[error("event cannot be decoded: {0}")]
    Decode(String),
}

/// Build the record to persist for a validated item.
pub fn to_record(
    validated: &ValidatedItem<'_>,
    reference: &ReferenceId,
) -> Result<StoredRecord, MappingError> {
    let item = validated.item;
    let event = compress_event(item.event.as_ref())?;

    Ok(StoredRecord {
        account_partition: partition_key(reference.contract_id(), validated.transaction_category),
        order_key: order_key(
            validated.transaction_effective_date,
            validated.posted_transaction_sequence_number,
        ),
        sort_key: sort_key(validated.posted_transaction_event_order_id),
        command_key: command_key(
            validated.financial_core_command_id,
            validated.financial_core_command_id_source,
        ),
        contract_id: reference.contract_id().to_string(),
        event,
        financial_core_command_id: validated.financial_core_command_id.to_string(),
        financial_core_command_id_source: validated.financial_core_command_id_source.to_string(),
        instrument_version_id: item.instrument_version_id.clone(),
        posted_transaction_event_order_id: validated.posted_transaction_event_order_id,
        posted_transaction_id: item.posted_transaction_id.clone(),
        posted_transaction_sequence_number: validated.posted_transaction_sequence_number,
        schema_reference: item.schema_reference.clone(),
        transaction_category: validated.transaction_category.to_string(),
        transaction_effective_date: validated.transaction_effective_date.to_string(),
        transaction_processing_date: item.transaction_processing_date.clone(),
    })
}
