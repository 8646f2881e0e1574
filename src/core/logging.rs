//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level so operators can turn
//! up a single module without editing the config file.

use crate::core::config::{LogFormat, LoggingConfig};
use crate::core::error::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter for `config`, preferring `RUST_LOG` when it is set
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| Error::config(format!("Invalid log level {:?}: {}", config.level, e))),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| Error::internal(format!("Failed to install log subscriber: {}", e)))
}
