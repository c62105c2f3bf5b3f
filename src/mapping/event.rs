//! Event payload encoding.
//!
//! Payloads are stored as base64 text of zlib-framed DEFLATE over the
//! compact JSON serialization. Only non-empty objects and arrays carry a
//! payload; absent, `null`, empty and scalar events encode to `""`.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::Value;

use super::MappingError;

/// Compress and encode an event payload.
pub fn compress_event(event: Option<&Value>) -> Result<String, MappingError> {
    let Some(event) = event.filter(|e| has_payload(e)) else {
        return Ok(String::new());
    };

    let text = serde_json::to_string(event).map_err(|e| MappingError::Serialize(e.to_string()))?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .map_err(|e| MappingError::Compress(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| MappingError::Compress(e.to_string()))?;
    Ok(BASE64.encode(compressed))
}

/// Decode and inflate a stored payload back to its JSON text.
pub fn inflate_event(encoded: &str) -> Result<String, MappingError> {
    if encoded.is_empty() {
        return Ok(String::new());
    }
    let compressed = BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| MappingError::Decode(e.to_string()))?;
    let mut text = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .map_err(|e| MappingError::Decode(e.to_string()))?;
    Ok(text)
}

/// The compact JSON text [`compress_event`] compresses, or `""` when it stores nothing.
pub fn canonical_text(event: Option<&Value>) -> String {
    match event.filter(|e| has_payload(e)) {
        Some(event) => event.to_string(),
        None => String::new(),
    }
}

fn has_payload(event: &Value) -> bool {
    match event {
        Value::Object(fields) => !fields.is_empty(),
        Value::Array(values) => !values.is_empty(),
        _ => false,
    }
}
