use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub(crate) struct InitArgs {
    /// Re-initialize if .carrinhos already exists
    #[arg(long)]
    pub(crate) force: bool,
    /// Path to initialize (defaults to current directory)
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
}

#[derive(Args)]
pub(crate) struct JsonArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
