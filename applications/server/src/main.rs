/// Waveplay Server - static file server for the web UI
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waveplay_server::{config::ServerConfig, create_router, state::AppState};

#[derive(Parser)]
#[command(name = "waveplay-server")]
#[command(about = "Serves the Waveplay web UI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Print the effective configuration as TOML
    ShowConfig {
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(clap::Args)]
struct Overrides {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Directory to serve files from
    #[arg(short, long)]
    root: Option<PathBuf>,
}

impl Overrides {
    fn resolve(self) -> anyhow::Result<ServerConfig> {
        let mut config = ServerConfig::load_from(self.config.as_deref())?;
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(root) = self.root {
            config.assets.root = root;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waveplay_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { overrides } => {
            serve(overrides.resolve()?).await?;
        }
        Commands::ShowConfig { overrides } => {
            print!("{}", toml::to_string_pretty(&overrides.resolve()?)?);
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Waveplay Server");
    tracing::info!("Serving files from {}", config.assets.root.display());

    let app = create_router(AppState::new(config.assets.root.clone()));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
