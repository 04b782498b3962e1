//! Typed configuration models and override resolution.
//!
//! # Design
//! - The file model keeps every field optional so partial files parse.
//! - Presence and URL checks happen in [`ServiceSettings::resolve`], after
//!   command-line and environment overrides have been layered on top.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Default HTTP timeout applied to every API call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Remote services the CLI talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Movie collection manager.
    Radarr,
    /// Series collection manager.
    Sonarr,
    /// Request tracker.
    Overseerr,
}

impl Service {
    /// Lowercase key used in the config file and flag names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Radarr => "radarr",
            Self::Sonarr => "sonarr",
            Self::Overseerr => "overseerr",
        }
    }
}

impl Display for Service {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrSweepConfig {
    /// Per-request HTTP timeout in seconds.
    #[serde(alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
    /// Radarr endpoint settings.
    pub radarr: ServiceSettings,
    /// Sonarr endpoint settings.
    pub sonarr: ServiceSettings,
    /// Overseerr endpoint settings.
    #[serde(alias = "overseer")]
    pub overseerr: ServiceSettings,
}

impl ArrSweepConfig {
    /// Settings block for a service.
    #[must_use]
    pub const fn service(&self, service: Service) -> &ServiceSettings {
        match service {
            Service::Radarr => &self.radarr,
            Service::Sonarr => &self.sonarr,
            Service::Overseerr => &self.overseerr,
        }
    }

    /// Effective HTTP timeout, preferring `override_secs` over the file value.
    #[must_use]
    pub fn timeout(&self, override_secs: Option<u64>) -> Duration {
        Duration::from_secs(
            override_secs
                .or(self.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Resolve a service's settings with overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] or [`ConfigError::InvalidUrl`] when the
    /// merged settings cannot be used.
    pub fn resolve(
        &self,
        service: Service,
        overrides: &ServiceOverrides,
    ) -> ConfigResult<ResolvedService> {
        self.service(service).resolve(service, overrides)
    }
}

/// Endpoint settings for a single service as written in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL including the API prefix, e.g. `http://localhost:7878/api/v3`.
    pub url: Option<String>,
    /// API key sent as `X-Api-Key`.
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceOverrides {
    /// Replacement base URL.
    pub url: Option<String>,
    /// Replacement API key.
    pub api_key: Option<String>,
}

/// Fully validated settings ready to build a client from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    /// Service these settings belong to.
    pub service: Service,
    /// Parsed base URL.
    pub url: Url,
    /// API key.
    pub api_key: String,
}

impl ServiceSettings {
    /// Merge overrides over the file values and validate the result.
    ///
    /// Blank strings are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the URL or API key is absent and
    /// [`ConfigError::InvalidUrl`] when the URL is not an absolute http(s) URL.
    pub fn resolve(
        &self,
        service: Service,
        overrides: &ServiceOverrides,
    ) -> ConfigResult<ResolvedService> {
        let raw_url = pick(overrides.url.as_deref(), self.url.as_deref()).ok_or(
            ConfigError::Missing {
                service,
                field: "url",
            },
        )?;
        let api_key = pick(overrides.api_key.as_deref(), self.api_key.as_deref()).ok_or(
            ConfigError::Missing {
                service,
                field: "api_key",
            },
        )?;

        let url = parse_base_url(service, raw_url)?;
        Ok(ResolvedService {
            service,
            url,
            api_key: api_key.to_string(),
        })
    }
}

fn pick<'a>(preferred: Option<&'a str>, fallback: Option<&'a str>) -> Option<&'a str> {
    preferred
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| fallback.map(str::trim).filter(|value| !value.is_empty()))
}

fn parse_base_url(service: Service, raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
        service,
        value: raw.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            service,
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            service,
            value: raw.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }

    Ok(url)
}
