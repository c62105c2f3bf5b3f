pub mod config;
pub mod error;
pub mod mapping;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod reference;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

pub use error::{DecryptError, Error, StoreError};
pub use model::{
    BatchWriteFailedItem, BatchWriteItem, BatchWriteRequest, BatchWriteResponse,
    ProcessingContext, ProcessingStatus, ResponseType, StoredRecord,
};
pub use pipeline::BatchWriteService;
pub use reference::{AesGcmDecryptor, Decryptor, ReferenceId};
pub use store::{
    InMemoryProvisionStore, InMemoryTransactionStore, ProvisionKey, ProvisionRecord,
    ProvisionStore, PutOutcome, TransactionStore,
};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
pub use http::{router, serve};
