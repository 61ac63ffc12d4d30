use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use config_commands::ConfigAction;

mod config_commands;

#[derive(Parser)]
#[command(name = "atelier", about = "Atelier — project tracker backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true, env = "ATELIER_BIND")]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true, env = "ATELIER_PORT")]
    port: Option<u16>,
    /// Config file to load (skips the usual discovery).
    #[arg(long, global = true, env = "ATELIER_CONFIG")]
    config: Option<std::path::PathBuf>,
    /// Data directory holding the store (overrides config value).
    #[arg(long, global = true, env = "ATELIER_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default when no subcommand is provided).
    Serve,
    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
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

    info!(version = env!("CARGO_PKG_VERSION"), "atelier starting");

    match cli.command {
        None | Some(Commands::Serve) => {
            let mut config = match cli.config {
                Some(ref path) => atelier_config::load_config(path)?,
                None => atelier_config::discover_and_load(),
            };

            // CLI args override config values.
            if let Some(bind) = cli.bind {
                config.server.bind = bind;
            }
            if let Some(port) = cli.port {
                config.server.port = port;
            }
            if let Some(data_dir) = cli.data_dir {
                config.storage.data_dir = Some(data_dir);
            }

            atelier_gateway::serve(&config).await
        },
        Some(Commands::Config { action }) => config_commands::handle_config(action),
    }
}
