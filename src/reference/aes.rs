//! AES-256-GCM reference decryptor.
//!
//! Token layout: `base64(nonce[12] || ciphertext || tag)`.

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::Decryptor;
use crate::error::DecryptError;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Decrypts account reference tokens sealed with a shared AES-256-GCM key.
#[derive(Clone)]
pub struct AesGcmDecryptor {
    cipher: Aes256Gcm,
}

impl fmt::Debug for AesGcmDecryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcmDecryptor")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl AesGcmDecryptor {
    /// Build from a base64-encoded 32-byte key.
    pub fn from_base64_key(key_b64: &str) -> Result<Self, DecryptError> {
        let key = BASE64
            .decode(key_b64.trim().as_bytes())
            .map_err(|e| DecryptError::InvalidKey(e.to_string()))?;
        Self::from_key(&key)
    }

    pub fn from_key(key: &[u8]) -> Result<Self, DecryptError> {
        if key.len() != KEY_LEN {
            return Err(DecryptError::InvalidKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|_| DecryptError::InvalidKey("rejected by cipher".into()))?;
        Ok(Self { cipher })
    }

    /// A fresh random key, base64-encoded.
    pub fn generate_key_base64() -> String {
        BASE64.encode(Aes256Gcm::generate_key(OsRng))
    }

    /// Encrypt `plaintext` into a token this decryptor accepts.
    pub fn seal(&self, plaintext: &str) -> Result<String, DecryptError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| DecryptError::Crypto)?;

        let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        token.extend_from_slice(nonce.as_slice());
        token.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(token))
    }
}

impl Decryptor for AesGcmDecryptor {
    fn decrypt(&self, token: &str) -> Result<String, DecryptError> {
        let raw = BASE64.decode(token.trim().as_bytes())?;
        if raw.len() <= NONCE_LEN {
            return Err(DecryptError::Crypto);
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| DecryptError::Crypto)?;
        String::from_utf8(plaintext).map_err(|_| DecryptError::Utf8)
    }
}
