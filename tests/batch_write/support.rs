//! Shared fixtures: a real AES-GCM key, sealed references and item builders.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use txn_store::{
    AesGcmDecryptor, BatchWriteItem, BatchWriteService, InMemoryProvisionStore,
    InMemoryTransactionStore, ProvisionKey, ProvisionRecord, ProvisionStore, PutOutcome,
    StoreError, StoredRecord, TransactionStore,
};

pub const CONTRACT: &str = "accountId=982cafbb-68dc-4e59-9db4-d655a002abe3~~sortId=999";

pub fn decryptor() -> AesGcmDecryptor {
    AesGcmDecryptor::from_base64_key(&AesGcmDecryptor::generate_key_base64()).unwrap()
}

/// A complete, valid item referencing `CONTRACT`.
pub fn item(decryptor: &AesGcmDecryptor, sequence_number: i32) -> BatchWriteItem {
    BatchWriteItem {
        account_reference_id: Some(decryptor.seal(CONTRACT).unwrap()),
        posted_transaction_id: Some(format!("ptx-{sequence_number}")),
        financial_core_command_id: Some(format!("cmd-{sequence_number}")),
        financial_core_command_id_source: Some("core-banking".into()),
        transaction_effective_date: Some("2024-03-01".into()),
        transaction_category: Some("POSTED".into()),
        transaction_processing_date: Some("2024-03-02".into()),
        posted_transaction_sequence_number: Some(sequence_number),
        posted_transaction_event_order_id: Some(1),
        schema_reference: Some("posted-transaction-v1".into()),
        instrument_version_id: None,
        event: Some(json!({
            "amount": { "value": "10.00", "currency": "USD" },
            "sequence": sequence_number
        })),
    }
}

pub struct Harness {
    pub decryptor: AesGcmDecryptor,
    pub transactions: InMemoryTransactionStore,
    pub provisions: InMemoryProvisionStore,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            decryptor: decryptor(),
            transactions: InMemoryTransactionStore::new(),
            provisions: InMemoryProvisionStore::new(),
        }
    }

    pub fn item(&self, sequence_number: i32) -> BatchWriteItem {
        item(&self.decryptor, sequence_number)
    }

    pub fn service(&self) -> BatchWriteService {
        BatchWriteService::new(
            Arc::new(self.decryptor.clone()),
            Arc::new(self.transactions.clone()),
        )
    }

    pub fn checked_service(&self) -> BatchWriteService {
        self.service()
            .with_provision_check(Arc::new(self.provisions.clone()))
    }
}

/// Fails every call with a backend error.
pub struct UnreachableStore;

#[async_trait]
impl TransactionStore for UnreachableStore {
    async fn put_if_absent(&self, _: &StoredRecord) -> Result<PutOutcome, StoreError> {
        Err(StoreError::Backend("service unavailable".into()))
    }
}

#[async_trait]
impl ProvisionStore for UnreachableStore {
    async fn get_provision(
        &self,
        _: &ProvisionKey,
    ) -> Result<Option<ProvisionRecord>, StoreError> {
        Err(StoreError::Backend("service unavailable".into()))
    }
}
