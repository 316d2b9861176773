use carrinhos::model::{ItemPatch, ListPatch, MembershipPatch};

use super::*;

pub(super) fn handle_item_command(dir: &ClientDir, command: ItemCommands) -> Result<()> {
    let client = loaded_client(dir)?;
    match command {
        ItemCommands::Add {
            name,
            category,
            unit,
        } => {
            let item = client.add_item(&name, &category, unit)?;
            println!("Created item {} ({}, {})", item.name, item.category, item.unit);
        }
        ItemCommands::Edit {
            item,
            name,
            category,
            unit,
        } => {
            let current = find_item(&client, &item)?;
            let patch = ItemPatch {
                name,
                category,
                unit,
            };
            let updated = client.update_item(&current.id, &patch)?;
            println!(
                "Updated item {} ({}, {})",
                updated.name, updated.category, updated.unit
            );
        }
        ItemCommands::Rm { item } => {
            let current = find_item(&client, &item)?;
            client.delete_item(&current.id)?;
            println!("Deleted item {}", current.name);
        }
    }
    Ok(())
}

pub(super) fn handle_list_command(dir: &ClientDir, command: ListCommands) -> Result<()> {
    let client = loaded_client(dir)?;
    match command {
        ListCommands::Add { name, description } => {
            let list = client.add_list(&name, description.as_deref())?;
            println!("Created list {}", list.name);
        }
        ListCommands::Edit {
            list,
            name,
            description,
        } => {
            let current = find_list(&client, &list)?;
            let patch = ListPatch {
                name,
                description: description.map(|d| (!d.trim().is_empty()).then_some(d)),
            };
            let updated = client.update_list(&current.id, &patch)?;
            println!("Updated list {}", updated.name);
        }
        ListCommands::Rm { list } => {
            let current = find_list(&client, &list)?;
            client.delete_list(&current.id)?;
            println!("Deleted list {}", current.name);
        }
    }
    Ok(())
}

pub(super) fn handle_entry_command(dir: &ClientDir, command: EntryCommands) -> Result<()> {
    let client = loaded_client(dir)?;
    match command {
        EntryCommands::Add {
            list,
            item,
            quantity,
            price,
        } => {
            let list = find_list(&client, &list)?;
            let item = find_item(&client, &item)?;
            let entry = client.add_item_to_list(&list.id, &item.id, quantity, price)?;
            println!(
                "{} on {}: {} {}",
                item.name, list.name, entry.quantity, item.unit
            );
        }
        EntryCommands::Set {
            list,
            item,
            quantity,
            price,
        } => {
            let entry = find_entry(&client, &list, &item)?;
            let patch = MembershipPatch {
                quantity,
                price,
                completed: None,
            };
            let updated = client.update_list_item(&entry.id, &patch)?;
            println!(
                "quantity: {} price: {:.2}",
                updated.quantity, updated.price
            );
        }
        EntryCommands::Toggle { list, item } => {
            let entry = find_entry(&client, &list, &item)?;
            let updated = client.toggle_completed(&entry.id)?;
            let mark = if updated.completed { "done" } else { "open" };
            println!("{} {}", item.trim(), mark);
        }
        EntryCommands::Rm { list, item } => {
            let entry = find_entry(&client, &list, &item)?;
            client.remove_item_from_list(&entry.id)?;
            println!("Removed {} from {}", item.trim(), list.trim());
        }
    }
    Ok(())
}
