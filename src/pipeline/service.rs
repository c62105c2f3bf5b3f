//! BatchWriteService: wires the pipeline stages to their collaborators.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use txn_store::{AesGcmDecryptor, BatchWriteService, InMemoryProvisionStore, InMemoryTransactionStore};
//!
//! let service = BatchWriteService::new(
//!     Arc::new(AesGcmDecryptor::from_base64_key(&key)?),
//!     Arc::new(InMemoryTransactionStore::new()),
//! )
//! .with_provision_check(Arc::new(InMemoryProvisionStore::new()))
//! .with_max_concurrency(32);
//!
//! let response = service.put_transactions(items).await;
//! ```

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

use super::{aggregate, check_provision, map_item, put_record};
use crate::model::{BatchWriteItem, BatchWriteResponse, ProcessingContext};
use crate::reference::Decryptor;
use crate::store::{ProvisionStore, TransactionStore};

/// Runs batches through the pipeline.
///
/// Shared read-only across requests; holds no per-batch state.
pub struct BatchWriteService {
    decryptor: Arc<dyn Decryptor>,
    transactions: Arc<dyn TransactionStore>,
    provisions: Option<Arc<dyn ProvisionStore>>,
    max_concurrency: usize,
}

impl fmt::Debug for BatchWriteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchWriteService")
            .field("provision_check", &self.provision_check_enabled())
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl BatchWriteService {
    pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

    /// Create a service without the provision check.
    pub fn new(decryptor: Arc<dyn Decryptor>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            decryptor,
            transactions,
            provisions: None,
            max_concurrency: Self::DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Require a provisioning record in `provisions` before writing.
    pub fn with_provision_check(mut self, provisions: Arc<dyn ProvisionStore>) -> Self {
        self.provisions = Some(provisions);
        self
    }

    /// Bound the number of items in flight per batch. Zero is treated as one.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn provision_check_enabled(&self) -> bool {
        self.provisions.is_some()
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Run one item through every stage.
    pub async fn process_item(&self, item: BatchWriteItem) -> ProcessingContext {
        let mut ctx = map_item(ProcessingContext::new(item), self.decryptor.as_ref());
        if let Some(provisions) = &self.provisions {
            ctx = check_provision(ctx, provisions.as_ref()).await;
        }
        put_record(ctx, self.transactions.as_ref()).await
    }

    /// Process a batch and classify the outcome.
    ///
    /// Items run concurrently up to the configured limit; results keep input order.
    #[instrument(skip_all, fields(batch_size = items.len()))]
    pub async fn put_transactions(&self, items: Vec<BatchWriteItem>) -> BatchWriteResponse {
        let contexts: Vec<ProcessingContext> = stream::iter(items)
            .map(|item| self.process_item(item))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let response = aggregate(&contexts);
        info!(
            total_sent = response.total_sent,
            total_written = response.total_written,
            failed_count = response.failed_count,
            response_type = ?response.response_type,
            "batch processed"
        );
        response
    }
}
