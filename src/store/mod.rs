//! Store collaborators.
//!
//! Two stores back the pipeline:
//!
//! - the transaction store, which accepts each record at most once per
//!   `(accountPartition, orderKey)`
//! - the account store, consulted for a provisioning record when the
//!   provision check is enabled
//!
//! ## Example
//!
//! ```ignore
//! let transactions = InMemoryTransactionStore::new();
//! match transactions.put_if_absent(&record).await? {
//!     PutOutcome::Inserted => {}
//!     PutOutcome::Conflict(existing) => { /* already written */ }
//! }
//! ```

mod in_memory;

#[cfg(feature = "dynamodb")]
mod dynamodb;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::model::StoredRecord;

pub use in_memory::{InMemoryProvisionStore, InMemoryTransactionStore};

#[cfg(feature = "dynamodb")]
pub use dynamodb::{connect, DynamoDbProvisionStore, DynamoDbTransactionStore};

/// Sequence number under which an account's provisioning record is stored.
pub const PROVISION_SEQUENCE_NUMBER: i32 = 0;

/// Result of a conditional insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    Inserted,
    /// A record with the same key already exists. Carries it when the
    /// backend returned it.
    Conflict(Option<StoredRecord>),
}

/// Lookup key for a provisioning record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionKey {
    pub contract_id: String,
    pub posted_transaction_sequence_number: i32,
}

impl ProvisionKey {
    /// The provisioning key for a contract.
    pub fn for_contract(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            posted_transaction_sequence_number: PROVISION_SEQUENCE_NUMBER,
        }
    }
}

/// A provisioning record. Only its presence matters to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionRecord {
    pub key: ProvisionKey,
    pub attributes: Map<String, Value>,
}

/// Durable, append-only transaction storage.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert `record` unless its `(account_partition, order_key)` is taken.
    ///
    /// A taken key is reported as [`PutOutcome::Conflict`], not as an error.
    async fn put_if_absent(&self, record: &StoredRecord) -> Result<PutOutcome, StoreError>;
}

/// Read access to provisioning records.
#[async_trait]
pub trait ProvisionStore: Send + Sync {
    async fn get_provision(&self, key: &ProvisionKey)
        -> Result<Option<ProvisionRecord>, StoreError>;
}
