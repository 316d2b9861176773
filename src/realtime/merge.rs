//! Merge policy for change-feed events.
//!
//! Inserts and updates are versioned upserts (an insert for a known id acts
//! as an update, an update for an unknown id inserts). Deletes remove by id,
//! cascade to memberships for items and lists, and leave a tombstone so an
//! older insert cannot resurrect the row.

use crate::model::{CatalogItem, ItemId, ListId, ListMembership, MembershipId, ShoppingList};
use crate::remote::{ChangeEvent, ChangeKind, Row, RowError, RowRecord, Table};
use crate::store::{Change, EntityStore, Merge};

/// Applies one event. Returns `None` when the event was skipped because its
/// row could not be decoded.
pub fn apply_event(store: &mut EntityStore, event: &ChangeEvent) -> Option<Merge> {
    let Some(id) = event.row_id() else {
        tracing::warn!(table = %event.table, seq = event.seq, "change event without row id");
        return None;
    };
    let id = id.to_string();

    let out = match event.table {
        Table::Item => decode::<CatalogItem>(event)
            .map(|change| store.merge_item(&ItemId(id.clone()), change, event.seq)),
        Table::ShoppingList => decode::<ShoppingList>(event)
            .map(|change| store.merge_list(&ListId(id.clone()), change, event.seq)),
        Table::ListItem => decode::<ListMembership>(event).map(|change| {
            store.merge_membership(&MembershipId(id.clone()), change, event.seq)
        }),
    };

    match out {
        Ok(merge) => {
            tracing::debug!(table = %event.table, id = %id, seq = event.seq, kind = ?event.kind, ?merge, "merged change");
            Some(merge)
        }
        Err(err) => {
            tracing::warn!(table = %event.table, id = %id, seq = event.seq, %err, "skipping undecodable change");
            None
        }
    }
}

fn decode<T: RowRecord>(event: &ChangeEvent) -> Result<Change<T>, RowError> {
    match event.kind {
        ChangeKind::Delete => Ok(Change::Delete),
        ChangeKind::Insert | ChangeKind::Update => {
            let empty = Row::new();
            let row = event.new.as_ref().unwrap_or(&empty);
            T::from_row(row).map(Change::Upsert)
        }
    }
}

#[cfg(test)]
#[path = "../tests/realtime/merge_tests.rs"]
mod tests;
