use clap::Subcommand;

use carrinhos::error::ValidationError;
use carrinhos::model::Unit;

use crate::{EntryCommands, ItemCommands, ListCommands, RemoteCommands};

pub(crate) mod session;
pub(crate) mod shopping;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Initialize a client directory (.carrinhos)
    Init(session::InitArgs),

    /// Configure or show the remote
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },

    /// Check credentials against the remote and remember the identity
    Login(session::LoginArgs),

    /// Forget the stored identity
    Logout,

    /// Show the stored identity
    Whoami(session::JsonArgs),

    /// List catalog items
    Items(shopping::ItemsArgs),

    /// List shopping lists with their progress
    Lists(session::JsonArgs),

    /// Show a list grouped by category
    Show(shopping::ShowArgs),

    /// Interpret a free-text command ("novo arroz categoria Grãos kg", "add arroz na mercado", ...)
    #[command(name = "run", alias = "cmd")]
    Run(shopping::RunArgs),

    /// Manage catalog items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Manage shopping lists
    List {
        #[command(subcommand)]
        command: ListCommands,
    },

    /// Manage the items of a list
    Entry {
        #[command(subcommand)]
        command: EntryCommands,
    },

    /// Follow remote changes and reprint a list (or all lists) as they happen
    Watch(shopping::WatchArgs),
}

pub(crate) fn parse_unit(s: &str) -> Result<Unit, ValidationError> {
    Unit::parse(s).ok_or_else(|| ValidationError::UnknownUnit(s.to_string()))
}
