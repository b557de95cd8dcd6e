//! Log subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{RuntimeError, RuntimeResult};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. With `json` set, events
/// are written as one JSON object per line.
pub fn init_tracing(default_filter: &str, json: bool) -> RuntimeResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| RuntimeError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| RuntimeError::Logging(e.to_string()))
}
