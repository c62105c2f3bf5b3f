//! Logging setup.
//!
//! `RUST_LOG` controls levels (e.g. `info`, `txn_store=debug`); the default
//! is `info`. JSON output flattens event fields into the top-level object so
//! `order_key` and `status` sit next to `message`.

use std::str::FromStr;
use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Error;

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    #[default]
    Json,
    /// Pretty-printed logs (for development).
    Pretty,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(Error::InvalidConfig(format!(
                "log format must be json or pretty (got {other})"
            ))),
        }
    }
}

/// Filter used when `RUST_LOG` is unset or unparseable.
const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber for the service.
///
/// Only the first call has an effect. If something else already installed a
/// subscriber, that one stays.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Exactly one of these is `Some`; a `None` layer is inert.
        let (json, pretty) = match format {
            LogFormat::Json => (Some(fmt::layer().json().flatten_event(true)), None),
            LogFormat::Pretty => (None, Some(fmt::layer().pretty())),
        };

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(json)
            .with(pretty)
            .try_init();
        if installed.is_err() {
            tracing::debug!("global subscriber already set");
        }
    });
}
