//! Name resolution against an in-memory snapshot.
//!
//! The stored name must contain the typed text; a longer query never matches
//! a shorter stored name.

use crate::model::{CatalogItem, ShoppingList};

pub trait Named {
    fn name(&self) -> &str;
}

impl Named for CatalogItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for ShoppingList {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, PartialEq)]
pub enum Resolution<'a, T> {
    Found(&'a T),
    /// Several stored names contain the query; never auto-picked.
    Ambiguous(Vec<&'a T>),
    /// Nothing contains the query, but these contain its first word.
    Suggestions(Vec<&'a T>),
    NotFound,
}

pub fn resolve<'a, T: Named>(query: &str, candidates: &'a [T]) -> Resolution<'a, T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Resolution::NotFound;
    }

    if let Some(exact) = candidates
        .iter()
        .find(|c| c.name().to_lowercase() == query)
    {
        return Resolution::Found(exact);
    }

    let mut hits = containing(candidates, &query);
    match hits.len() {
        1 => return Resolution::Found(hits.remove(0)),
        0 => {}
        _ => return Resolution::Ambiguous(hits),
    }

    let first = query.split_whitespace().next().unwrap_or_default();
    if first == query {
        return Resolution::NotFound;
    }
    let loose = containing(candidates, first);
    if loose.is_empty() {
        Resolution::NotFound
    } else {
        Resolution::Suggestions(loose)
    }
}

fn containing<'a, T: Named>(candidates: &'a [T], needle: &str) -> Vec<&'a T> {
    candidates
        .iter()
        .filter(|c| c.name().to_lowercase().contains(needle))
        .collect()
}

/// `A, B, C` for suggestion messages.
pub fn join_names<T: Named>(found: &[&T]) -> String {
    found
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "../tests/command/resolve_tests.rs"]
mod tests;
