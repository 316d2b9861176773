use clap::Args;

#[derive(Args)]
pub(crate) struct ItemsArgs {
    /// Only items whose name or category contains this text
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ShowArgs {
    pub(crate) list: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct RunArgs {
    /// Command text; words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub(crate) text: Vec<String>,
    /// Carry out a delete the command asks to confirm
    #[arg(long, short = 'y')]
    pub(crate) yes: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct WatchArgs {
    /// Only print this list
    pub(crate) list: Option<String>,
    /// Stop after this many seconds (runs until interrupted otherwise)
    #[arg(long)]
    pub(crate) seconds: Option<u64>,
}
