//! Batch ingest integration tests.

mod support;
mod pipeline;
mod properties;

#[cfg(feature = "http")]
mod http;
