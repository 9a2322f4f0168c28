use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use risk_conflict_server::{config::ServerConfig, engine::Engine, server};

/// Authoritative game server for the line protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON server configuration; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Players needed before the game starts
    #[arg(long)]
    players: Option<usize>,

    /// Do not log battle traces
    #[arg(short, long)]
    quiet: bool,

    /// JSON map replacing the built-in one
    #[arg(long)]
    map: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, std::io::Error> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load_from_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(players) = self.players {
            config.players = players;
        }
        if self.map.is_some() {
            config.map_file = self.map;
        }
        config.quiet_battles |= self.quiet;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("risk_conflict_server=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to read config");
            std::process::exit(1);
        }
    };

    let world = match config.build_world() {
        Ok(world) => world,
        Err(e) => {
            error!(error = %e, "failed to build world");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(config.bind_address()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_address(), error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(players = config.players, "waiting for players");
    let engine = Engine::spawn(world, config.players);
    if let Err(e) = server::run(listener, engine).await {
        error!(error = %e, "server stopped");
    }
}
