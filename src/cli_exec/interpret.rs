use std::time::{Duration, Instant};

use serde_json::json;

use carrinhos::command::{DeferredAction, ResultKind};
use carrinhos::store::Snapshot;

use super::*;

const WATCH_TICK: Duration = Duration::from_millis(250);

pub(super) fn handle_items_command(
    dir: &ClientDir,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let client = loaded_client(dir)?;
    let snapshot = client.snapshot();
    let items: Vec<&CatalogItem> = match search {
        Some(term) => snapshot.search_items(term),
        None => snapshot.items.iter().collect(),
    };
    if json {
        return print_json(&items, "items json");
    }
    for item in items {
        let lists = snapshot.linked_lists(&item.id);
        if lists.is_empty() {
            println!("{} [{}] {}", item.name, item.category, item.unit);
        } else {
            let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
            println!(
                "{} [{}] {} (in {})",
                item.name,
                item.category,
                item.unit,
                names.join(", ")
            );
        }
    }
    Ok(())
}

pub(super) fn handle_lists_command(dir: &ClientDir, json: bool) -> Result<()> {
    let client = loaded_client(dir)?;
    let snapshot = client.snapshot();
    if json {
        let out: Vec<_> = snapshot
            .lists
            .iter()
            .map(|l| {
                let s = snapshot.list_summary(&l.id);
                json!({
                    "list": l,
                    "entries": s.entries,
                    "completed": s.completed,
                    "total": s.total,
                })
            })
            .collect();
        return print_json(&out, "lists json");
    }
    print_lists(&snapshot);
    Ok(())
}

pub(super) fn handle_show_command(dir: &ClientDir, list: &str, json: bool) -> Result<()> {
    let client = loaded_client(dir)?;
    let list = find_list(&client, list)?;
    let snapshot = client.snapshot();
    if json {
        let groups: Vec<_> = snapshot
            .grouped_by_category(&list.id)
            .into_iter()
            .map(|g| {
                let entries: Vec<_> = g
                    .entries
                    .iter()
                    .map(|e| {
                        json!({
                            "entry": e.membership,
                            "item": e.item,
                            "subtotal": e.subtotal(),
                        })
                    })
                    .collect();
                json!({ "category": g.category, "entries": entries })
            })
            .collect();
        return print_json(
            &json!({ "list": list, "categories": groups }),
            "list json",
        );
    }
    print_list(&snapshot, &list);
    Ok(())
}

pub(super) fn handle_run_command(dir: &ClientDir, text: &str, yes: bool, json: bool) -> Result<()> {
    let client = loaded_client(dir)?;
    let result = client.process_command(text);
    if json {
        print_json(&result, "command result json")?;
    } else {
        println!("{}", result.message);
    }

    match &result.action {
        Some(action @ (DeferredAction::DeleteItem(_) | DeferredAction::DeleteList(_))) => {
            if yes {
                client.confirm_delete(action)?;
                if !json {
                    println!("Excluído.");
                }
            } else if !json {
                println!("(re-run with --yes to delete)");
            }
        }
        Some(DeferredAction::EditItem(item)) if !json => {
            println!("(use `carrinhos item edit {:?} --name ...`)", item.name);
        }
        Some(DeferredAction::EditList(list)) if !json => {
            println!("(use `carrinhos list edit {:?} --name ...`)", list.name);
        }
        _ => {}
    }

    if result.kind == ResultKind::Error {
        anyhow::bail!("command failed");
    }
    Ok(())
}

pub(super) fn handle_watch_command(
    dir: &ClientDir,
    list: Option<&str>,
    seconds: Option<u64>,
) -> Result<()> {
    let mut client = loaded_client(dir)?;
    let only = list.map(|name| find_list(&client, name)).transpose()?;
    client
        .subscribe_to_realtime()
        .context("subscribe to change-feed")?;
    tracing::info!(channels = client.realtime_channels(), "watching for changes");

    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));
    let mut last: Option<Snapshot> = None;
    let mut last_error: Option<String> = None;
    while deadline.is_none_or(|d| Instant::now() < d) {
        let snapshot = client.snapshot();
        if last.as_ref() != Some(&snapshot) {
            match &only {
                Some(list) => match snapshot.list(&list.id) {
                    Some(current) => print_list(&snapshot, current),
                    None => println!("List {} was deleted", list.name),
                },
                None => print_lists(&snapshot),
            }
            println!();
            last = Some(snapshot);
        }
        let error = client.error();
        if error != last_error {
            if let Some(message) = &error {
                eprintln!("error: {}", message);
            }
            last_error = error;
        }
        std::thread::sleep(WATCH_TICK);
    }
    client.dispose();
    Ok(())
}

fn print_lists(snapshot: &Snapshot) {
    if snapshot.lists.is_empty() {
        println!("No lists");
    }
    for list in &snapshot.lists {
        let s = snapshot.list_summary(&list.id);
        println!(
            "{} {}/{} R$ {:.2}",
            list.name, s.completed, s.entries, s.total
        );
    }
}

fn print_list(snapshot: &Snapshot, list: &ShoppingList) {
    println!("{}", list.name);
    if let Some(description) = &list.description {
        println!("  {}", description);
    }
    for group in snapshot.grouped_by_category(&list.id) {
        println!("  {}", group.category);
        for e in &group.entries {
            let mark = if e.membership.completed { "x" } else { " " };
            println!(
                "    [{}] {} {} {} R$ {:.2}",
                mark,
                e.item.name,
                e.membership.quantity,
                e.unit(),
                e.subtotal()
            );
        }
    }
    let s = snapshot.list_summary(&list.id);
    println!("  {}/{} done, total R$ {:.2}", s.completed, s.entries, s.total);
}
