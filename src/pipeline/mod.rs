//! Per-item processing pipeline and batch aggregation.
//!
//! Each item moves through the stages below as a [`ProcessingContext`]. A
//! stage that sees a terminal context hands it back untouched, so the first
//! failure is the one reported.
//!
//! ```text
//!   map_item ──► check_provision (optional) ──► put_record ──► aggregate
//!   validate      account store lookup          conditional     one category
//!   resolve                                     insert          per batch
//!   derive keys
//! ```
//!
//! [`ProcessingContext`]: crate::model::ProcessingContext

mod mapper;
mod outcome;
mod provision;
mod service;
mod writer;

pub use mapper::map_item;
pub use outcome::{aggregate, classify};
pub use provision::{check_provision, NO_PROVISION_RECORD};
pub use service::BatchWriteService;
pub use writer::put_record;
