// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events. Applications and test
//! harnesses that want to see them call [`init_logging`] once at startup.
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Install a global subscriber according to `config`.
///
/// Fails with a configuration error for an unknown format or level, or when
/// a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            Error::config(format!("invalid log level '{}': {e}", config.level))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format.as_str() {
        "pretty" => registry
            .with(fmt::layer().pretty().with_target(true))
            .try_init(),
        "compact" => registry
            .with(fmt::layer().compact().with_target(true))
            .try_init(),
        "json" => registry
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        other => {
            return Err(Error::config(format!(
                "unknown log format '{other}' (expected pretty, compact or json)"
            )))
        }
    };
    installed.map_err(|e| Error::config(format!("logging already initialized: {e}")))
}
