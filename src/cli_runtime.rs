use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use carrinhos::model::RemoteConfig;
use carrinhos::remote::RemoteClient;
use carrinhos::session::ClientDir;
use carrinhos::{Carrinhos, Options};

use crate::Commands;

#[derive(Parser)]
#[command(name = "carrinhos")]
#[command(about = "Shopping lists from the command line", long_about = None)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    crate::cli_exec::handle_command(cli.command)
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install tracing subscriber")
}

pub(crate) fn require_remote(dir: &ClientDir) -> Result<RemoteConfig> {
    let cfg = dir.read_config()?;
    cfg.remote
        .context("no remote configured (run `carrinhos remote set --url ... --api-key ...`)")
}

/// Builds a client against the configured remote, owned by the signed-in
/// user (if any).
pub(crate) fn connect(dir: &ClientDir) -> Result<Carrinhos> {
    let cfg = dir.read_config()?;
    let remote = require_remote(dir)?;
    let client = RemoteClient::new(remote).context("create remote client")?;
    let options = Options {
        owner: dir.owner()?,
        poll_wait: Duration::from_millis(cfg.poll_wait_ms),
    };
    Ok(Carrinhos::new(std::sync::Arc::new(client), options))
}
