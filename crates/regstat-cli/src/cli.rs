use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "regstat",
    about = "Docker registry notification collector",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the collector server
    Serve(ServeArgs),
    /// Load a configuration file, validate it, and print the result
    CheckConfig(CheckConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address, overrides the configuration file
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Notification route, overrides the configuration file
    #[arg(long)]
    pub route: Option<String>,

    /// Document store connection URI, overrides the configuration file
    #[arg(long)]
    pub store_uri: Option<String>,

    /// Database name, overrides the configuration file
    #[arg(long)]
    pub database: Option<String>,

    /// Collection name, overrides the configuration file
    #[arg(long)]
    pub collection: Option<String>,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    /// Path to a TOML configuration file
    pub config: PathBuf,
}
