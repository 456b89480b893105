//! tfs-upload entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tfs_upload_transfer::{CommitItem, validate_repository_path};
use tracing_subscriber::EnvFilter;

/// Upload local files to a version-control server's upload service.
#[derive(Debug, Parser)]
#[command(name = "tfs-upload", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Workspace name.
    #[arg(short, long)]
    pub workspace: String,

    /// Workspace owner.
    #[arg(short, long)]
    pub owner: String,

    /// Files to upload, as `<local path>=<$/server/path>`.
    #[arg(required = true, value_parser = parse_item)]
    pub items: Vec<CommitItem>,
}

/// Parses `<local path>=<$/server/path>`.
///
/// Splits on the last `=`; server paths cannot contain one in practice but
/// local paths might.
fn parse_item(arg: &str) -> Result<CommitItem, String> {
    let (local, server) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected <local>=<$/server/path>, got {arg:?}"))?;
    if local.is_empty() {
        return Err(format!("missing local path in {arg:?}"));
    }
    validate_repository_path(server).map_err(|e| e.to_string())?;
    Ok(CommitItem::new(local, server))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting tfs-upload");

    let config = config::Config::load(&cli.config)?;
    tracing::info!(collection = %config.collection_uri, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(cli, config))
}
