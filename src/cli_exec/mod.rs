use anyhow::{Context, Result};

use carrinhos::Carrinhos;
use carrinhos::model::{CatalogItem, ListMembership, ShoppingList};
use carrinhos::session::ClientDir;

use crate::{
    Commands, EntryCommands, ItemCommands, ListCommands, RemoteCommands, connect, require_remote,
};

mod catalog;
mod dispatch;
mod interpret;
mod session;

pub(super) fn handle_command(command: Commands) -> Result<()> {
    dispatch::handle_command(command)
}

pub(super) fn discover_client_dir() -> Result<ClientDir> {
    ClientDir::discover(&std::env::current_dir().context("get current dir")?)
}

pub(super) fn with_client_dir<F>(f: F) -> Result<()>
where
    F: FnOnce(&ClientDir) -> Result<()>,
{
    let dir = discover_client_dir()?;
    f(&dir)
}

/// Connects and loads every collection.
pub(super) fn loaded_client(dir: &ClientDir) -> Result<Carrinhos> {
    let mut client = connect(dir)?;
    client.load_all().context("load shopping data")?;
    Ok(client)
}

pub(super) fn find_item(client: &Carrinhos, name: &str) -> Result<CatalogItem> {
    client
        .snapshot()
        .item_named(name)
        .cloned()
        .with_context(|| format!("no item named {:?}", name.trim()))
}

pub(super) fn find_list(client: &Carrinhos, name: &str) -> Result<ShoppingList> {
    client
        .snapshot()
        .list_named(name)
        .cloned()
        .with_context(|| format!("no list named {:?}", name.trim()))
}

pub(super) fn find_entry(client: &Carrinhos, list: &str, item: &str) -> Result<ListMembership> {
    let list = find_list(client, list)?;
    let item = find_item(client, item)?;
    client
        .snapshot()
        .membership(&list.id, &item.id)
        .cloned()
        .with_context(|| format!("{:?} is not on list {:?}", item.name, list.name))
}

fn print_json<T: serde::Serialize>(value: &T, label: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {}", label))?
    );
    Ok(())
}
