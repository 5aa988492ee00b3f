//! Error types for `flow_core`.
//!
//! Only configuration loading can fail. The per-frame path never returns an
//! error: missing camera frames, out-of-range grid lookups and empty particle
//! pools all degrade to safe defaults inside the simulation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating a [`SimConfig`](crate::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON or has mistyped fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot run with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field:  &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }
}
