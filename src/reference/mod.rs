//! Account reference resolution.
//!
//! Callers identify the account with an opaque, encrypted token. Decrypted,
//! it is a `~~`-delimited list of `key=value` segments:
//!
//! ```text
//! accountId=982cafbb-68dc-4e59-9db4-d655a002abe3~~sortId=999
//! ```
//!
//! The whole plaintext is the contract id used in key derivation; `accountId`
//! and `sortId` must both be present and non-blank.

mod aes;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::error::DecryptError;

pub use aes::AesGcmDecryptor;

/// Segment delimiter inside a decrypted reference.
pub const DELIMITER: &str = "~~";
/// Key/value separator inside a segment.
pub const SEPARATOR: char = '=';
pub const ACCOUNT_ID: &str = "accountId";
pub const SORT_ID: &str = "sortId";

/// Decrypts account reference tokens.
///
/// Implementations must fail on malformed or untrusted input rather than
/// returning garbage plaintext.
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, token: &str) -> Result<String, DecryptError>;
}

/// A resolved account reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceId {
    contract_id: String,
    account_id: String,
    sort_id: String,
}

impl ReferenceId {
    /// The full decrypted plaintext; prefix of the partition key and the
    /// provision lookup key.
    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn sort_id(&self) -> &str {
        &self.sort_id
    }
}

/// Why a reference token could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("accountReferenceId cannot be decrypted: {0}")]
    Undecryptable(String),

    #[error("contractId cannot be null or empty")]
    EmptyPlaintext,

    #[error("Decrypted accountId or sortId cannot be empty")]
    MissingIdentifier,
}

/// Decrypt `token` and parse it into a [`ReferenceId`].
pub fn resolve(decryptor: &dyn Decryptor, token: &str) -> Result<ReferenceId, ReferenceError> {
    let plaintext = decryptor
        .decrypt(token)
        .map_err(|e| ReferenceError::Undecryptable(e.to_string()))?;
    if plaintext.is_empty() {
        return Err(ReferenceError::EmptyPlaintext);
    }

    let fields = parse_fields(&plaintext).map_err(ReferenceError::Undecryptable)?;
    let account_id = fields.get(ACCOUNT_ID).copied().unwrap_or_default();
    let sort_id = fields.get(SORT_ID).copied().unwrap_or_default();
    if account_id.trim().is_empty() || sort_id.trim().is_empty() {
        return Err(ReferenceError::MissingIdentifier);
    }

    Ok(ReferenceId {
        account_id: account_id.to_string(),
        sort_id: sort_id.to_string(),
        contract_id: plaintext,
    })
}

/// Split a decrypted reference into its key/value fields.
///
/// Trailing empty segments are ignored. A segment without a separator, or a
/// key that appears twice, rejects the whole reference. The error text names
/// the segment position only, never its decrypted content.
pub fn parse_fields(plaintext: &str) -> Result<BTreeMap<&str, &str>, String> {
    let mut segments: Vec<&str> = plaintext.split(DELIMITER).collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    let mut fields = BTreeMap::new();
    for (index, segment) in segments.into_iter().enumerate() {
        let (key, value) = segment
            .split_once(SEPARATOR)
            .ok_or_else(|| format!("segment {index} is not a key{SEPARATOR}value entry"))?;
        if fields.insert(key, value).is_some() {
            return Err(format!("duplicate key [{key}]"));
        }
    }
    Ok(fields)
}
