use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::TransactionalBackend;
use super::constants::{
    ENV_AUTH_AUDIENCE, ENV_AUTH_ISSUER, ENV_AUTH_JWKS_URL, ENV_CONFIG, ENV_DATA_DIR, ENV_HOST,
    ENV_PORT, ENV_TRANSACTIONAL_BACKEND,
};

#[derive(Parser)]
#[command(name = "playdeck")]
#[command(version, about = "Playlist sharing service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Disable authentication (for development)
    #[arg(long, global = true)]
    pub no_auth: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Data directory (databases)
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Transactional database backend (sqlite or memory)
    #[arg(long, global = true, env = ENV_TRANSACTIONAL_BACKEND, value_parser = parse_transactional_backend)]
    pub transactional_backend: Option<TransactionalBackend>,

    /// OIDC issuer URL for token validation
    #[arg(long, global = true, env = ENV_AUTH_ISSUER)]
    pub auth_issuer: Option<String>,

    /// Expected token audience
    #[arg(long, global = true, env = ENV_AUTH_AUDIENCE)]
    pub auth_audience: Option<String>,

    /// Provider JWKS URL
    #[arg(long, global = true, env = ENV_AUTH_JWKS_URL)]
    pub auth_jwks_url: Option<String>,
}

/// Parse transactional backend from CLI/env string
fn parse_transactional_backend(s: &str) -> Result<TransactionalBackend, String> {
    match s.to_lowercase().as_str() {
        "sqlite" => Ok(TransactionalBackend::Sqlite),
        "memory" => Ok(TransactionalBackend::Memory),
        _ => Err(format!(
            "Invalid transactional backend '{}'. Valid options: sqlite, memory",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auth: bool,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub transactional_backend: Option<TransactionalBackend>,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub auth_jwks_url: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        no_auth: cli.no_auth,
        config: cli.config,
        data_dir: cli.data_dir,
        transactional_backend: cli.transactional_backend,
        auth_issuer: cli.auth_issuer,
        auth_audience: cli.auth_audience,
        auth_jwks_url: cli.auth_jwks_url,
    };
    (config, cli.command)
}
