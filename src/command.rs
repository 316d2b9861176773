//! Free-text command interpreter.
//!
//! Interpretation is split in two: [`plan`] is a pure function of the input
//! and a store [`Snapshot`]; creations it asks for are carried out by the
//! caller, which reports back through [`Creation::finish`].

use serde::Serialize;

use crate::error::Error;
use crate::model::{CatalogItem, ListMembership, ShoppingList, Unit};
use crate::store::Snapshot;

pub mod grammar;
mod plan;
pub mod resolve;

pub use self::plan::{Step, plan};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Success,
    Error,
    /// Suggestions and actions waiting for confirmation.
    Info,
}

/// An edit or delete the caller must confirm before anything is written.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum DeferredAction {
    EditItem(CatalogItem),
    EditList(ShoppingList),
    DeleteItem(CatalogItem),
    DeleteList(ShoppingList),
}

impl DeferredAction {
    fn message(&self) -> String {
        match self {
            DeferredAction::EditItem(i) => format!("Abrindo edição do item \"{}\"...", i.name),
            DeferredAction::EditList(l) => format!("Abrindo edição da lista \"{}\"...", l.name),
            DeferredAction::DeleteItem(i) => {
                format!("Abrindo confirmação para excluir o item \"{}\"...", i.name)
            }
            DeferredAction::DeleteList(l) => {
                format!("Abrindo confirmação para excluir a lista \"{}\"...", l.name)
            }
        }
    }
}

/// Record created by a command.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum Created {
    Item(CatalogItem),
    List(ShoppingList),
    Membership(ListMembership),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub kind: ResultKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<DeferredAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Created>,
}

impl CommandResult {
    pub fn success(message: String) -> Self {
        Self {
            success: true,
            message,
            kind: ResultKind::Success,
            action: None,
            created: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message,
            kind: ResultKind::Error,
            action: None,
            created: None,
        }
    }

    /// Suggestions: nothing happened, but the input was close.
    pub fn info(message: String) -> Self {
        Self {
            success: false,
            message,
            kind: ResultKind::Info,
            action: None,
            created: None,
        }
    }

    pub fn deferred(action: DeferredAction) -> Self {
        Self {
            success: true,
            message: action.message(),
            kind: ResultKind::Info,
            action: Some(action),
            created: None,
        }
    }

    /// Failure outside interpretation (e.g. a backend error).
    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self::error(format!("Erro ao processar comando: {}", err))
    }
}

/// A record the interpreter wants created.
#[derive(Clone, Debug, PartialEq)]
pub enum Creation {
    List {
        name: String,
    },
    Item {
        name: String,
        category: String,
        unit: Unit,
    },
    Membership {
        item: CatalogItem,
        list: ShoppingList,
    },
}

impl Creation {
    /// Turns the outcome of the create into the user-facing result. A
    /// backend conflict means another writer got there first.
    pub fn finish(&self, outcome: Result<Created, Error>) -> CommandResult {
        match outcome {
            Ok(created) => {
                let mut out = CommandResult::success(self.success_message());
                out.created = Some(created);
                out
            }
            Err(err) if err.is_conflict() => CommandResult::error(self.duplicate_message()),
            Err(err) => CommandResult::failed(err),
        }
    }

    fn success_message(&self) -> String {
        match self {
            Creation::List { name } => format!("Lista \"{}\" criada com sucesso! 🎉", name),
            Creation::Item {
                name,
                category,
                unit,
            } => format!(
                "Item \"{}\" criado na categoria \"{}\" ({}) ✨",
                name, category, unit
            ),
            Creation::Membership { item, list } => {
                format!("\"{}\" adicionado à lista \"{}\" 🛒", item.name, list.name)
            }
        }
    }

    fn duplicate_message(&self) -> String {
        match self {
            Creation::List { name } => format!("Lista \"{}\" já existe!", name),
            Creation::Item { name, .. } => format!("Item \"{}\" já existe!", name),
            Creation::Membership { item, list } => {
                format!("\"{}\" já está na lista \"{}\"!", item.name, list.name)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/command/plan_tests.rs"]
mod tests;
