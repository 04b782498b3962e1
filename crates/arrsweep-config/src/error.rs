//! Error types for configuration loading and resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::Service;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}", .path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The configuration file was not valid TOML for the expected layout.
    #[error("failed to parse configuration file {}", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Source TOML error.
        source: toml::de::Error,
    },
    /// A required service setting was absent from every source.
    #[error(
        "{service}.{field} is not configured; set it in the config file or pass --{service}-{}",
        .field.replace('_', "-")
    )]
    Missing {
        /// Service the setting belongs to.
        service: Service,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A service URL could not be used as an API base.
    #[error("invalid {service} URL '{value}': {reason}")]
    InvalidUrl {
        /// Service the URL belongs to.
        service: Service,
        /// Offending value.
        value: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
