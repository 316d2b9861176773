use super::catalog::{handle_entry_command, handle_item_command, handle_list_command};
use super::interpret::{
    handle_items_command, handle_lists_command, handle_run_command, handle_show_command,
    handle_watch_command,
};
use super::session::{
    handle_init_command, handle_login_command, handle_logout_command, handle_remote_command,
    handle_whoami_command,
};
use super::*;

pub(super) fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init(args) => handle_init_command(args.force, args.path)?,
        Commands::Remote { command } => with_client_dir(|d| handle_remote_command(d, command))?,
        Commands::Login(args) => {
            with_client_dir(|d| handle_login_command(d, &args.email, &args.password))?
        }
        Commands::Logout => with_client_dir(handle_logout_command)?,
        Commands::Whoami(args) => with_client_dir(|d| handle_whoami_command(d, args.json))?,
        Commands::Items(args) => {
            with_client_dir(|d| handle_items_command(d, args.search.as_deref(), args.json))?
        }
        Commands::Lists(args) => with_client_dir(|d| handle_lists_command(d, args.json))?,
        Commands::Show(args) => {
            with_client_dir(|d| handle_show_command(d, &args.list, args.json))?
        }
        Commands::Run(args) => with_client_dir(|d| {
            handle_run_command(d, &args.text.join(" "), args.yes, args.json)
        })?,
        Commands::Item { command } => with_client_dir(|d| handle_item_command(d, command))?,
        Commands::List { command } => with_client_dir(|d| handle_list_command(d, command))?,
        Commands::Entry { command } => with_client_dir(|d| handle_entry_command(d, command))?,
        Commands::Watch(args) => with_client_dir(|d| {
            handle_watch_command(d, args.list.as_deref(), args.seconds)
        })?,
    }
    Ok(())
}
