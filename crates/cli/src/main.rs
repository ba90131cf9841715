mod check_command;
mod config_commands;
mod run_command;
mod watch_commands;

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "livewatch",
    about = "Livewatch — Twitch live notifications for Discord",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./livewatch.toml and ~/.config/livewatch/).
    #[arg(long, short, global = true, env = "LIVEWATCH_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and keep notifications in sync (default).
    Run,
    /// Edit the watch list file directly.
    Watch {
        #[command(subcommand)]
        action: watch_commands::WatchAction,
    },
    /// Query Twitch once for every watched channel and print what would be posted.
    Check,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);
    debug!(version = env!("CARGO_PKG_VERSION"), "livewatch starting");

    let config = livewatch_config::discover_and_load(cli.config.as_deref())?;

    match cli.command {
        None | Some(Commands::Run) => run_command::run(config).await,
        Some(Commands::Watch { action }) => watch_commands::handle_watch(action, &config).await,
        Some(Commands::Check) => check_command::check(&config).await,
        Some(Commands::Config { action }) => config_commands::handle_config(action, &config),
    }
}
