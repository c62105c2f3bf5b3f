//! Data model for batch ingest.
//!
//! - [`BatchWriteItem`] / [`BatchWriteRequest`]: what callers submit.
//! - [`StoredRecord`]: what lands in the transaction store.
//! - [`ProcessingContext`] / [`ProcessingStatus`]: per-item pipeline state.
//! - [`BatchWriteResponse`]: the aggregated batch outcome.

mod context;
mod item;
mod record;
mod response;
mod status;

pub use context::ProcessingContext;
pub use item::{BatchWriteItem, BatchWriteRequest};
pub use record::StoredRecord;
pub use response::{BatchWriteFailedItem, BatchWriteResponse, ResponseType};
pub use status::ProcessingStatus;
