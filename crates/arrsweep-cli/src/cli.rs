//! Argument parsing, context construction and command dispatch.

use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use arrsweep_config::{CONFIG_ENV_VAR, ServiceOverrides};
use arrsweep_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::{AppContext, CliError, CliResult, ServiceFlags};
use crate::commands::movies::{handle_movies_list, handle_movies_search};
use crate::commands::requests::handle_requests_list;
use crate::commands::series::{handle_prune_season, handle_series_search};
use crate::console::{StdConsole, Theme};

const DEFAULT_LIMIT: usize = 10;

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
    }) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = build_context(&cli)?;
    let mut console = StdConsole::new(ctx.theme);

    let (workflow, report) = match cli.command {
        Command::Movies(MoviesCommand::List(args)) => {
            return handle_movies_list(&ctx, args.limit).await;
        }
        Command::Requests(RequestsCommand::List) => return handle_requests_list(&ctx).await,
        Command::Movies(MoviesCommand::SearchAndDelete(args)) => (
            "movies search-and-delete",
            handle_movies_search(&ctx, &mut console, args.skip, args.limit).await?,
        ),
        Command::Series(SeriesCommand::SearchAndDelete(args)) => (
            "series search-and-delete",
            handle_series_search(&ctx, &mut console, args.skip, args.limit).await?,
        ),
        Command::Series(SeriesCommand::PruneSeason(args)) => (
            "series prune-season",
            handle_prune_season(&ctx, &mut console, args.limit).await?,
        ),
    };
    report.log(workflow);
    Ok(())
}

fn build_context(cli: &Cli) -> CliResult<AppContext> {
    let config = arrsweep_config::load(cli.config.as_deref())
        .map_err(|err| CliError::validation(format!("{:#}", anyhow::Error::new(err))))?;
    let timeout = config.timeout(cli.timeout);
    if timeout.is_zero() {
        return Err(CliError::validation("HTTP timeout must be at least 1 second"));
    }

    let color_capable = io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none();
    let theme = Theme::from_choice(cli.color, color_capable);
    colored::control::set_override(theme.is_colored());

    Ok(AppContext {
        config,
        flags: cli.services.flags(),
        timeout,
        output: cli.output,
        theme,
    })
}

#[derive(Parser)]
#[command(
    name = "arrsweep",
    about = "Find the largest media in Radarr and Sonarr and delete it along with its Overseerr request"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = CONFIG_ENV_VAR,
        help = "Configuration file (defaults to ~/.arrsweep.toml)"
    )]
    config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "ARRSWEEP_HTTP_TIMEOUT_SECS",
        help = "HTTP timeout in seconds for every service call"
    )]
    timeout: Option<u64>,
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(
        long,
        global = true,
        value_parser = parse_log_format,
        default_value = "pretty"
    )]
    log_format: LogFormat,
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for listing commands"
    )]
    output: OutputFormat,
    #[command(flatten)]
    services: ServiceArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ServiceArgs {
    #[arg(long, global = true, env = "RADARR_URL")]
    radarr_url: Option<String>,
    #[arg(long, global = true, env = "RADARR_API_KEY", hide_env_values = true)]
    radarr_api_key: Option<String>,
    #[arg(long, global = true, env = "SONARR_URL")]
    sonarr_url: Option<String>,
    #[arg(long, global = true, env = "SONARR_API_KEY", hide_env_values = true)]
    sonarr_api_key: Option<String>,
    #[arg(long, global = true, env = "OVERSEERR_URL")]
    overseerr_url: Option<String>,
    #[arg(long, global = true, env = "OVERSEERR_API_KEY", hide_env_values = true)]
    overseerr_api_key: Option<String>,
}

impl ServiceArgs {
    fn flags(&self) -> ServiceFlags {
        ServiceFlags {
            radarr: ServiceOverrides {
                url: self.radarr_url.clone(),
                api_key: self.radarr_api_key.clone(),
            },
            sonarr: ServiceOverrides {
                url: self.sonarr_url.clone(),
                api_key: self.sonarr_api_key.clone(),
            },
            overseerr: ServiceOverrides {
                url: self.overseerr_url.clone(),
                api_key: self.overseerr_api_key.clone(),
            },
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Radarr movies.
    #[command(subcommand)]
    Movies(MoviesCommand),
    /// Sonarr series.
    #[command(subcommand)]
    Series(SeriesCommand),
    /// Overseerr requests.
    #[command(subcommand)]
    Requests(RequestsCommand),
}

#[derive(Subcommand)]
enum MoviesCommand {
    /// List the largest movies on disk.
    List(ListArgs),
    /// Pick movies to delete together with their requests.
    #[command(alias = "searchanddelete")]
    SearchAndDelete(SearchArgs),
}

#[derive(Subcommand)]
enum SeriesCommand {
    /// Pick series to delete together with their requests.
    #[command(alias = "searchanddelete")]
    SearchAndDelete(SearchArgs),
    /// Delete and unmonitor a single season of a series.
    PruneSeason(ListArgs),
}

#[derive(Subcommand)]
enum RequestsCommand {
    /// List every Overseerr request.
    List,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, default_value_t = DEFAULT_LIMIT, help = "Maximum number of items to show")]
    limit: usize,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, default_value_t = DEFAULT_LIMIT, help = "Maximum number of items to show")]
    limit: usize,
    #[arg(long, default_value_t = 0, help = "Number of largest items to skip")]
    skip: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}
