use super::grammar::{Intent, parse};
use super::resolve::{Named, Resolution, join_names, resolve};
use super::*;

/// What the interpreter decided for one input.
#[derive(Clone, Debug)]
pub enum Step {
    /// Nothing to write; hand the result to the caller.
    Reply(CommandResult),
    /// A record must be created; see [`Creation::finish`].
    Create(Creation),
}

/// Pure interpretation of `input` against `snapshot`. No I/O.
pub fn plan(input: &str, snapshot: &Snapshot) -> Step {
    match parse(input) {
        Intent::DeleteList(name) => {
            defer(list_target(&name, snapshot, ""), |l| DeferredAction::DeleteList(l.clone()))
        }
        Intent::DeleteItem(name) => {
            defer(item_target(&name, snapshot, ""), |i| DeferredAction::DeleteItem(i.clone()))
        }
        Intent::EditList(name) => {
            defer(list_target(&name, snapshot, ""), |l| DeferredAction::EditList(l.clone()))
        }
        Intent::EditItem(name) => {
            defer(item_target(&name, snapshot, ""), |i| DeferredAction::EditItem(i.clone()))
        }
        Intent::CreateList(name) => {
            if snapshot.list_named(&name).is_some() {
                return Step::Reply(CommandResult::error(format!("Lista \"{}\" já existe!", name)));
            }
            Step::Create(Creation::List { name })
        }
        Intent::CreateItem {
            name,
            category,
            unit,
        } => {
            if snapshot.item_named(&name).is_some() {
                return Step::Reply(CommandResult::error(format!("Item \"{}\" já existe!", name)));
            }
            Step::Create(Creation::Item {
                name,
                category,
                unit,
            })
        }
        Intent::AddToList { item, list } => {
            let item_hint = format!("Use: \"novo {}\" para criar.", item);
            let item = match item_target(&item, snapshot, &item_hint) {
                Ok(i) => i.clone(),
                Err(reply) => return Step::Reply(reply),
            };
            let list_hint = format!("Use: \"add lista {}\" para criar.", list);
            let list = match list_target(&list, snapshot, &list_hint) {
                Ok(l) => l.clone(),
                Err(reply) => return Step::Reply(reply),
            };
            if snapshot.membership(&list.id, &item.id).is_some() {
                return Step::Reply(CommandResult::error(format!(
                    "\"{}\" já está na lista \"{}\"!",
                    item.name, list.name
                )));
            }
            Step::Create(Creation::Membership { item, list })
        }
        Intent::Unrecognized => Step::Reply(CommandResult::error(format!(
            "Comando \"{}\" não reconhecido. Comandos disponíveis: \"add\", \"novo\", \"del\", \"edit\"",
            input.trim()
        ))),
    }
}

fn defer<T>(target: Result<&T, CommandResult>, action: impl FnOnce(&T) -> DeferredAction) -> Step {
    match target {
        Ok(t) => {
            let action = action(t);
            Step::Reply(CommandResult::deferred(action))
        }
        Err(reply) => Step::Reply(reply),
    }
}

fn item_target<'a>(
    name: &str,
    snapshot: &'a Snapshot,
    hint: &str,
) -> Result<&'a CatalogItem, CommandResult> {
    target("Item", "encontrado", name, resolve(name, &snapshot.items), hint)
}

fn list_target<'a>(
    name: &str,
    snapshot: &'a Snapshot,
    hint: &str,
) -> Result<&'a ShoppingList, CommandResult> {
    target("Lista", "encontrada", name, resolve(name, &snapshot.lists), hint)
}

fn target<'a, T: Named>(
    noun: &str,
    found_word: &str,
    name: &str,
    resolution: Resolution<'a, T>,
    hint: &str,
) -> Result<&'a T, CommandResult> {
    match resolution {
        Resolution::Found(t) => Ok(t),
        Resolution::Ambiguous(hits) => Err(CommandResult::info(format!(
            "Vários resultados para \"{}\". Você quis dizer: {}?",
            name,
            join_names(&hits)
        ))),
        Resolution::Suggestions(hits) => Err(CommandResult::info(format!(
            "{} \"{}\" não {}. Você quis dizer: {}?",
            noun,
            name,
            found_word,
            join_names(&hits)
        ))),
        Resolution::NotFound if hint.is_empty() => Err(CommandResult::error(format!(
            "{} \"{}\" não existe.",
            noun, name
        ))),
        Resolution::NotFound => Err(CommandResult::error(format!(
            "{} \"{}\" não existe. {}",
            noun, name, hint
        ))),
    }
}
