use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use flightbook::log_format::TargetFirstFormat;
use flightbook::settings::{self, DEFAULT_ENVIRONMENT, Settings};

mod commands;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "flightbook",
    version,
    about = "Personal flight logbook API server"
)]
struct Cli {
    /// Environment name; selects `settings.<environment>.*` and, for
    /// development environments, the `.env` secrets file
    #[arg(long, env = "FLIGHTBOOK_ENV", default_value = DEFAULT_ENVIRONMENT, global = true)]
    environment: String,

    /// Directory containing the settings files
    #[arg(long, env = "FLIGHTBOOK_CONFIG_DIR", default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Disable coloured log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Migrate, seed reference data, and serve the HTTP API
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Exit non-zero if any embedded migration has not been applied
    CheckMigrations,
    /// Print a bearer token for a user
    IssueToken {
        /// Owning-user id placed in the token subject (at most 36 characters)
        #[arg(long)]
        user_id: String,
        /// Token lifetime; defaults to `token.lifetime_hours`
        #[arg(long)]
        hours: Option<i64>,
    },
}

/// Returns the settings and the developer secrets file that was loaded, if any.
fn load_settings(config_dir: &Path, environment: &str) -> Result<(Settings, Option<PathBuf>)> {
    let secrets = if settings::is_development(environment) {
        settings::load_developer_secrets(config_dir)?
    } else {
        None
    };
    Ok((Settings::load(config_dir, environment)?, secrets))
}

fn init_tracing(settings: &Settings, ansi: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(TargetFirstFormat::new(ansi))
                .with_ansi(ansi),
        )
        .with(sentry_tracing::layer())
        .init();
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry.dsn.as_deref()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(settings.environment.clone().into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    tracing::info!("Sentry error reporting enabled");
    Some(guard)
}

async fn run(command: Commands, settings: Settings) -> Result<()> {
    match command {
        Commands::Serve => commands::handle_serve(&settings).await,
        Commands::Migrate => commands::handle_migrate(&settings).await,
        Commands::CheckMigrations => commands::handle_check_migrations(&settings).await,
        Commands::IssueToken { user_id, hours } => {
            commands::handle_issue_token(&settings, &user_id, hours)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (settings, secrets) = load_settings(&cli.config_dir, &cli.environment)?;
    init_tracing(&settings, !cli.no_color);
    if let Some(path) = secrets {
        tracing::info!("Loaded developer secrets from {}", path.display());
    }
    // Held for the life of the process so queued events are flushed on exit
    let _sentry = init_sentry(&settings);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, settings))
}
