mod cli_commands;
mod cli_exec;
mod cli_runtime;
mod cli_subcommands;

use cli_commands::Commands;
use cli_runtime::{connect, require_remote};
use cli_subcommands::{EntryCommands, ItemCommands, ListCommands, RemoteCommands};

fn main() {
    if let Err(err) = cli_runtime::run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
