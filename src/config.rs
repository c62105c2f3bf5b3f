//! Service configuration.
//!
//! Loaded once from `TXN_STORE_*` environment variables at startup and
//! immutable afterwards. Values are trimmed; empty values count as unset.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::observability::LogFormat;
use crate::reference::AesGcmDecryptor;

/// Where records are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Process-local maps; contents are lost on exit.
    #[default]
    Memory,
    DynamoDb,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "dynamodb" => Ok(Backend::DynamoDb),
            other => Err(Error::InvalidConfig(format!(
                "TXN_STORE_BACKEND must be memory or dynamodb (got {other})"
            ))),
        }
    }
}

/// Runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Bind address for the HTTP listener.
    pub http_addr: String,
    pub log_format: LogFormat,
    pub backend: Backend,
    pub transaction_table: Option<String>,
    pub account_table: Option<String>,
    /// Overrides the DynamoDB endpoint (e.g. DynamoDB Local).
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
    /// Require a provisioning record before each write.
    pub provision_validation: bool,
    /// Items processed concurrently within one batch.
    pub max_concurrency: usize,
    /// Base64 AES-256 key for account reference tokens.
    pub encryption_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            log_format: LogFormat::Json,
            backend: Backend::Memory,
            transaction_table: None,
            account_table: None,
            dynamodb_endpoint: None,
            aws_region: "us-east-1".to_string(),
            provision_validation: false,
            max_concurrency: 16,
            encryption_key: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("http_addr", &self.http_addr)
            .field("log_format", &self.log_format)
            .field("backend", &self.backend)
            .field("transaction_table", &self.transaction_table)
            .field("account_table", &self.account_table)
            .field("dynamodb_endpoint", &self.dynamodb_endpoint)
            .field("aws_region", &self.aws_region)
            .field("provision_validation", &self.provision_validation)
            .field("max_concurrency", &self.max_concurrency)
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Config {
    /// Load from the environment, then [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for unparseable values or an
    /// inconsistent combination.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = env_string("TXN_STORE_HTTP_ADDR") {
            config.http_addr = addr;
        }
        if let Some(format) = env_string("TXN_STORE_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        if let Some(backend) = env_string("TXN_STORE_BACKEND") {
            config.backend = backend.parse()?;
        }
        config.transaction_table = env_string("TXN_STORE_TRANSACTION_TABLE");
        config.account_table = env_string("TXN_STORE_ACCOUNT_TABLE");
        config.dynamodb_endpoint = env_string("TXN_STORE_DYNAMODB_ENDPOINT");
        if let Some(region) = env_string("TXN_STORE_AWS_REGION") {
            config.aws_region = region;
        }
        if let Some(enabled) = env_parsed("TXN_STORE_PROVISION_VALIDATION", |v| {
            parse_flag("TXN_STORE_PROVISION_VALIDATION", v)
        })? {
            config.provision_validation = enabled;
        }
        if let Some(n) = env_parsed("TXN_STORE_MAX_CONCURRENCY", |v| {
            parse_count("TXN_STORE_MAX_CONCURRENCY", v)
        })? {
            config.max_concurrency = n;
        }
        config.encryption_key = env_string("TXN_STORE_ENCRYPTION_KEY");

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field requirements.
    pub fn validate(&self) -> Result<()> {
        if self.encryption_key.is_none() {
            return Err(Error::InvalidConfig(
                "TXN_STORE_ENCRYPTION_KEY is required".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(Error::InvalidConfig(
                "TXN_STORE_MAX_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        if self.backend == Backend::DynamoDb {
            if self.transaction_table.is_none() {
                return Err(Error::InvalidConfig(
                    "TXN_STORE_TRANSACTION_TABLE is required when TXN_STORE_BACKEND=dynamodb"
                        .to_string(),
                ));
            }
            if self.provision_validation && self.account_table.is_none() {
                return Err(Error::InvalidConfig(
                    "TXN_STORE_ACCOUNT_TABLE is required when TXN_STORE_PROVISION_VALIDATION=true"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build the account reference decryptor from the configured key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when no key is set, [`Error::Decryptor`] when
    /// the key is not base64 or not 32 bytes.
    pub fn decryptor(&self) -> Result<AesGcmDecryptor> {
        let key = self.encryption_key.as_deref().ok_or_else(|| {
            Error::InvalidConfig("TXN_STORE_ENCRYPTION_KEY is required".to_string())
        })?;
        Ok(AesGcmDecryptor::from_base64_key(key)?)
    }
}

/// A `TXN_STORE_*` value, trimmed. Blank counts as unset.
fn env_string(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn env_parsed<T>(name: &str, parse: impl FnOnce(&str) -> Result<T>) -> Result<Option<T>> {
    env_string(name).map(|value| parse(&value)).transpose()
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{name} must be a whole number (got {value})")))
}

/// Flags accept `true`/`false`, `1`/`0`, `on`/`off` in any case.
fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "{name} must be true or false (got {value})"
        ))),
    }
}
