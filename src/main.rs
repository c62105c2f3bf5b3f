//! `txn-store` binary entrypoint.
//!
//! Loads configuration from environment variables and starts the HTTP server.

use std::sync::Arc;

use anyhow::Result;

use txn_store::config::{Backend, Config};
use txn_store::observability::init_logging;
use txn_store::{
    BatchWriteService, InMemoryProvisionStore, InMemoryTransactionStore, ProvisionStore,
    TransactionStore,
};

type Stores = (Arc<dyn TransactionStore>, Option<Arc<dyn ProvisionStore>>);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(config.log_format);
    tracing::info!(config = ?config, "starting txn-store");

    let decryptor = config.decryptor()?;

    let (transactions, provisions) = match config.backend {
        Backend::Memory => memory_stores(&config),
        Backend::DynamoDb => dynamodb_stores(&config).await?,
    };

    let mut service = BatchWriteService::new(Arc::new(decryptor), transactions)
        .with_max_concurrency(config.max_concurrency);
    if let Some(provisions) = provisions {
        service = service.with_provision_check(provisions);
    }

    txn_store::http::serve(Arc::new(service), &config.http_addr).await?;
    Ok(())
}

fn memory_stores(config: &Config) -> Stores {
    tracing::warn!("using in-memory stores; records are lost on exit");
    let provisions: Option<Arc<dyn ProvisionStore>> = if config.provision_validation {
        Some(Arc::new(InMemoryProvisionStore::new()))
    } else {
        None
    };
    (Arc::new(InMemoryTransactionStore::new()), provisions)
}

#[cfg(feature = "dynamodb")]
async fn dynamodb_stores(config: &Config) -> Result<Stores> {
    use anyhow::Context;
    use txn_store::store::{connect, DynamoDbProvisionStore, DynamoDbTransactionStore};

    let client = connect(&config.aws_region, config.dynamodb_endpoint.as_deref()).await;
    let table = config
        .transaction_table
        .clone()
        .context("TXN_STORE_TRANSACTION_TABLE is required")?;
    tracing::info!(table = %table, region = %config.aws_region, "using DynamoDB transaction store");

    let provisions: Option<Arc<dyn ProvisionStore>> = if config.provision_validation {
        let account_table = config
            .account_table
            .clone()
            .context("TXN_STORE_ACCOUNT_TABLE is required")?;
        Some(Arc::new(DynamoDbProvisionStore::new(client.clone(), account_table)))
    } else {
        None
    };
    Ok((Arc::new(DynamoDbTransactionStore::new(client, table)), provisions))
}

#[cfg(not(feature = "dynamodb"))]
async fn dynamodb_stores(_config: &Config) -> Result<Stores> {
    anyhow::bail!("TXN_STORE_BACKEND=dynamodb requires the `dynamodb` feature")
}
