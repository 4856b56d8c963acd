use std::path::PathBuf;

use clap::Parser;

/// Parley chat gateway
#[derive(Debug, Parser)]
#[command(name = "parley", about = "Chat turn orchestration with tool calling")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "parley.toml", env = "PARLEY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PARLEY_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Log filter directives (e.g. `info,parley_chat=debug`)
    #[arg(long, default_value = "info", env = "PARLEY_LOG")]
    pub log: String,
}
