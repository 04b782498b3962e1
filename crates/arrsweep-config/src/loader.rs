//! Locating and parsing the configuration file.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::ArrSweepConfig;

/// File name looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".arrsweep.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "ARRSWEEP_CONFIG";

/// Default configuration path (`~/.arrsweep.toml`), if a home directory exists.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Load configuration from `explicit` or from the default location.
///
/// An explicitly named file must exist. A missing default file yields an empty
/// configuration so every value can come from flags or the environment.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] when a file exists (or
/// was named explicitly) but cannot be read or parsed.
pub fn load(explicit: Option<&Path>) -> ConfigResult<ArrSweepConfig> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    let Some(path) = default_config_path() else {
        debug!("no home directory; using empty configuration");
        return Ok(ArrSweepConfig::default());
    };

    match load_from(&path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, using defaults");
            Ok(ArrSweepConfig::default())
        }
        other => other,
    }
}

/// Load configuration from a specific file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and
/// [`ConfigError::Parse`] when its contents are not valid configuration.
pub fn load_from(path: &Path) -> ConfigResult<ArrSweepConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
