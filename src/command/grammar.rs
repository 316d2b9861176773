//! Command templates, tried in priority order; first match wins.
//!
//! ```text
//! del lista <name>
//! del <name>
//! edit lista <name>
//! edit <name>
//! add lista <name>
//! novo <name> [categoria <category>] [kg|litro|unidade]
//! add <item> na <list>
//! ```

use crate::model::{DEFAULT_CATEGORY, Unit};

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    DeleteList(String),
    DeleteItem(String),
    EditList(String),
    EditItem(String),
    CreateList(String),
    CreateItem {
        name: String,
        category: String,
        unit: Unit,
    },
    AddToList {
        item: String,
        list: String,
    },
    Unrecognized,
}

/// Parses `input` after trimming and lower-casing it.
pub fn parse(input: &str) -> Intent {
    let cmd = input.trim().to_lowercase();

    if let Some(name) = tail(&cmd, "del lista ") {
        return Intent::DeleteList(name);
    }
    if let Some(name) = tail(&cmd, "del ") {
        return Intent::DeleteItem(name);
    }
    if let Some(name) = tail(&cmd, "edit lista ") {
        return Intent::EditList(name);
    }
    if let Some(name) = tail(&cmd, "edit ") {
        return Intent::EditItem(name);
    }
    if let Some(name) = tail(&cmd, "add lista ") {
        return Intent::CreateList(name);
    }
    if let Some(body) = cmd.strip_prefix("novo ")
        && let Some(intent) = parse_novo(body)
    {
        return intent;
    }
    if let Some(body) = cmd.strip_prefix("add ")
        && let Some((item, list)) = split_na(body)
    {
        return Intent::AddToList { item, list };
    }
    Intent::Unrecognized
}

/// `<prefix>(.+)`, captured text trimmed and required non-empty.
fn tail(cmd: &str, prefix: &str) -> Option<String> {
    let rest = cmd.strip_prefix(prefix)?.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Lazy split at the first ` na ` leaving text on both sides.
fn split_na(body: &str) -> Option<(String, String)> {
    const SEP: &str = " na ";
    let mut from = 0;
    while let Some(off) = body[from..].find(SEP) {
        let at = from + off;
        let item = body[..at].trim();
        let list = body[at + SEP.len()..].trim();
        if at > 0 && !body[at + SEP.len()..].is_empty() {
            if item.is_empty() || list.is_empty() {
                return None;
            }
            return Some((item.to_string(), list.to_string()));
        }
        from = at + 1;
    }
    None
}

/// Shortest name such that the remainder is an optional
/// `categoria <category>` clause (shortest category) followed by an
/// optional unit word.
fn parse_novo(body: &str) -> Option<Intent> {
    for end in body.char_indices().map(|(i, c)| i + c.len_utf8()) {
        let (name, rest) = body.split_at(end);
        if let Some((category, unit)) = category_clause(rest) {
            return Some(create_item(name, Some(category), unit));
        }
        if let Some(unit) = unit_clause(rest) {
            return Some(create_item(name, None, unit));
        }
    }
    None
}

fn create_item(name: &str, category: Option<&str>, unit: Option<Unit>) -> Intent {
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY);
    Intent::CreateItem {
        name: name.trim().to_string(),
        category: category.to_string(),
        unit: unit.unwrap_or_default(),
    }
}

/// `\s+categoria\s+(.+?)` followed by a unit clause.
fn category_clause(rest: &str) -> Option<(&str, Option<Unit>)> {
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }
    let after_kw = after_ws.strip_prefix("categoria")?;
    let value = after_kw.trim_start();
    if value.len() == after_kw.len() {
        return None;
    }
    for (i, c) in value.char_indices() {
        let end = i + c.len_utf8();
        if let Some(unit) = unit_clause(&value[end..]) {
            return Some((&value[..end], unit));
        }
    }
    None
}

/// Matches `(\s+(kg|litro|unidade))?$`: `Some(None)` for an empty remainder.
fn unit_clause(rest: &str) -> Option<Option<Unit>> {
    if rest.is_empty() {
        return Some(None);
    }
    let word = rest.trim_start();
    if word.len() == rest.len() {
        return None;
    }
    Unit::ALL
        .into_iter()
        .find(|u| u.as_str() == word)
        .map(Some)
}

#[cfg(test)]
#[path = "../tests/command/grammar_tests.rs"]
mod tests;
