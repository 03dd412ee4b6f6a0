use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ballot",
    about = "Ballot Ledger: proposals, one vote per account, and a winner",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Host a voting ledger over HTTP
    Serve(ServeArgs),
    /// Write or print the deployment descriptor of a ledger
    Descriptor(DescriptorArgs),
    /// Run a scripted voting session against an in-process ledger
    Simulate(SimulateArgs),
    /// Derive a new account id
    Keygen(KeygenArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML server configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct DescriptorArgs {
    /// Owner account, as hex
    #[arg(long)]
    pub owner: String,
    #[arg(long, default_value = "default")]
    pub label: String,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// TOML script with `owner`, `seeds` and `[[steps]]`
    pub script: PathBuf,
}

#[derive(Args)]
pub struct KeygenArgs {
    /// Derive deterministically from this text instead of randomly
    #[arg(long)]
    pub seed: Option<String>,
}
