//! HashMap-backed stores for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{ProvisionKey, ProvisionRecord, ProvisionStore, PutOutcome, TransactionStore};
use crate::error::StoreError;
use crate::model::StoredRecord;

type RecordKey = (String, String);

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".into())
}

/// In-memory transaction store keyed by `(account_partition, order_key)`.
///
/// Check-and-insert happens under one write lock, so two concurrent writers
/// of the same key see exactly one `Inserted`. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryTransactionStore {
    records: Arc<RwLock<HashMap<RecordKey, StoredRecord>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored record.
    pub fn get(&self, account_partition: &str, order_key: &str) -> Result<Option<StoredRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .get(&(account_partition.to_string(), order_key.to_string()))
            .cloned())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }

    /// All stored records, sorted by key.
    pub fn records(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let mut all: Vec<StoredRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(all)
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn put_if_absent(&self, record: &StoredRecord) -> Result<PutOutcome, StoreError> {
        let key = (record.account_partition.clone(), record.order_key.clone());
        let mut records = self.records.write().map_err(|_| poisoned())?;

        if let Some(existing) = records.get(&key) {
            return Ok(PutOutcome::Conflict(Some(existing.clone())));
        }
        records.insert(key, record.clone());
        Ok(PutOutcome::Inserted)
    }
}

/// In-memory account store holding provisioning records.
#[derive(Clone, Default)]
pub struct InMemoryProvisionStore {
    records: Arc<RwLock<HashMap<ProvisionKey, ProvisionRecord>>>,
}

impl InMemoryProvisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the provisioning record for `contract_id`.
    pub fn provision(&self, contract_id: &str) -> Result<(), StoreError> {
        self.insert(ProvisionRecord {
            key: ProvisionKey::for_contract(contract_id),
            attributes: Map::from_iter([(
                "contractId".to_string(),
                Value::String(contract_id.to_string()),
            )]),
        })
    }

    pub fn insert(&self, record: ProvisionRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(record.key.clone(), record);
        Ok(())
    }
}

#[async_trait]
impl ProvisionStore for InMemoryProvisionStore {
    async fn get_provision(
        &self,
        key: &ProvisionKey,
    ) -> Result<Option<ProvisionRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(key).cloned())
    }
}
