//! Error types and the per-run service context shared by command handlers.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use arrsweep_clients::{ApiClient, OverseerrClient, RadarrClient, SonarrClient};
use arrsweep_config::{ArrSweepConfig, Service, ServiceOverrides};

use crate::cli::OutputFormat;
use crate::console::Theme;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 1,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Command-line and environment overrides for every service.
#[derive(Debug, Clone, Default)]
pub(crate) struct ServiceFlags {
    pub(crate) radarr: ServiceOverrides,
    pub(crate) sonarr: ServiceOverrides,
    pub(crate) overseerr: ServiceOverrides,
}

impl ServiceFlags {
    pub(crate) const fn for_service(&self, service: Service) -> &ServiceOverrides {
        match service {
            Service::Radarr => &self.radarr,
            Service::Sonarr => &self.sonarr,
            Service::Overseerr => &self.overseerr,
        }
    }
}

/// Application context passed to command handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) config: ArrSweepConfig,
    pub(crate) flags: ServiceFlags,
    pub(crate) timeout: Duration,
    pub(crate) output: OutputFormat,
    pub(crate) theme: Theme,
}

impl AppContext {
    fn api(&self, service: Service) -> CliResult<ApiClient> {
        let resolved = self
            .config
            .resolve(service, self.flags.for_service(service))
            .map_err(|err| CliError::validation(err.to_string()))?;
        tracing::debug!(
            service = %service,
            url = %resolved.url,
            timeout_secs = self.timeout.as_secs(),
            "resolved service endpoint"
        );
        ApiClient::from_resolved(&resolved, self.timeout).map_err(CliError::failure)
    }

    pub(crate) fn radarr(&self) -> CliResult<RadarrClient> {
        self.api(Service::Radarr).map(RadarrClient::new)
    }

    pub(crate) fn sonarr(&self) -> CliResult<SonarrClient> {
        self.api(Service::Sonarr).map(SonarrClient::new)
    }

    pub(crate) fn overseerr(&self) -> CliResult<OverseerrClient> {
        self.api(Service::Overseerr).map(OverseerrClient::new)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use arrsweep_config::{ArrSweepConfig, ServiceSettings};
    use httpmock::MockServer;

    use super::{AppContext, ServiceFlags};
    use crate::cli::OutputFormat;
    use crate::console::Theme;

    fn settings(server: &MockServer, prefix: &str, key: &str) -> ServiceSettings {
        ServiceSettings {
            url: Some(format!("{}{prefix}", server.base_url())),
            api_key: Some(key.to_string()),
        }
    }

    /// Context whose three services all point at `server`.
    pub(crate) fn context_with(server: &MockServer) -> AppContext {
        AppContext {
            config: ArrSweepConfig {
                timeout_secs: Some(5),
                radarr: settings(server, "/radarr/api/v3", "radarr-key"),
                sonarr: settings(server, "/sonarr/api/v3", "sonarr-key"),
                overseerr: settings(server, "/overseerr/api/v1", "overseerr-key"),
            },
            flags: ServiceFlags::default(),
            timeout: Duration::from_secs(5),
            output: OutputFormat::Table,
            theme: Theme::plain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use httpmock::MockServer;

    #[test]
    fn exit_codes_separate_validation_from_failure() {
        let validation = CliError::validation("radarr.url is not configured");
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "radarr.url is not configured");

        let failure = CliError::failure(anyhow!("inner").context("fetching movies failed"));
        assert_eq!(failure.exit_code(), 1);
        assert_eq!(failure.display_message(), "fetching movies failed: inner");
    }

    #[test]
    fn missing_service_settings_are_validation_errors() {
        let server = MockServer::start();
        let mut ctx = testing::context_with(&server);
        ctx.config.sonarr = arrsweep_config::ServiceSettings::default();

        let err = ctx.sonarr().expect_err("sonarr is unconfigured");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("sonarr.url"));
        assert!(ctx.radarr().is_ok());
    }

    #[test]
    fn flags_override_file_settings() {
        let server = MockServer::start();
        let mut ctx = testing::context_with(&server);
        ctx.config.overseerr = arrsweep_config::ServiceSettings::default();
        ctx.flags.overseerr = ServiceOverrides {
            url: Some("http://localhost:5055/api/v1".to_string()),
            api_key: Some("from-flag".to_string()),
        };

        assert!(ctx.overseerr().is_ok());
    }
}
