//! In-memory projection of the three backend tables.
//!
//! Records coming from the backend carry the commit sequence number they
//! were written at. Each collection remembers the highest sequence it has
//! reconciled per id (deletes included), so late or reordered changes can
//! never overwrite newer state. Optimistic local writes carry no sequence;
//! while one is in flight, backend changes for the same id are held back
//! until the write settles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{CatalogItem, ItemId, ListId, ListMembership, MembershipId, ShoppingList};
use crate::remote::{Loaded, Stored};

mod collection;
mod views;

pub use self::collection::{Change, Collection, Merge, Record};
pub use self::views::{CategoryGroup, EntryView, ListSummary, Snapshot};

#[derive(Default)]
pub struct EntityStore {
    items: Collection<CatalogItem>,
    lists: Collection<ShoppingList>,
    memberships: Collection<ListMembership>,
    loading: usize,
    error: Option<String>,
}

impl EntityStore {
    pub fn items(&self) -> &Collection<CatalogItem> {
        &self.items
    }

    pub fn lists(&self) -> &Collection<ShoppingList> {
        &self.lists
    }

    pub fn memberships(&self) -> &Collection<ListMembership> {
        &self.memberships
    }

    pub fn items_mut(&mut self) -> &mut Collection<CatalogItem> {
        &mut self.items
    }

    pub fn lists_mut(&mut self) -> &mut Collection<ShoppingList> {
        &mut self.lists
    }

    pub fn memberships_mut(&mut self) -> &mut Collection<ListMembership> {
        &mut self.memberships
    }

    /// All memberships of one list.
    pub fn memberships_for(&self, list_id: &ListId) -> Vec<ListMembership> {
        self.memberships
            .records()
            .iter()
            .filter(|m| &m.list_id == list_id)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            items: self.items.records().to_vec(),
            lists: self.lists.records().to_vec(),
            memberships: self.memberships.records().to_vec(),
        }
    }

    /// Local cascade: drops memberships pointing at `item_id`.
    pub fn cascade_item(&mut self, item_id: &ItemId) -> Vec<ListMembership> {
        self.memberships.remove_where(|m| &m.item_id == item_id)
    }

    pub fn cascade_list(&mut self, list_id: &ListId) -> Vec<ListMembership> {
        self.memberships.remove_where(|m| &m.list_id == list_id)
    }

    pub fn merge_item(&mut self, id: &ItemId, change: Change<CatalogItem>, seq: u64) -> Merge {
        let deleting = matches!(change, Change::Delete);
        let out = self.items.merge(id, change, seq);
        if deleting && out == Merge::Applied {
            self.cascade_item(id);
        }
        out
    }

    pub fn merge_list(&mut self, id: &ListId, change: Change<ShoppingList>, seq: u64) -> Merge {
        let deleting = matches!(change, Change::Delete);
        let out = self.lists.merge(id, change, seq);
        if deleting && out == Merge::Applied {
            self.cascade_list(id);
        }
        out
    }

    pub fn merge_membership(
        &mut self,
        id: &MembershipId,
        change: Change<ListMembership>,
        seq: u64,
    ) -> Merge {
        self.memberships.merge(id, change, seq)
    }

    pub fn settle_item(&mut self, id: &ItemId, ack: Option<(u64, Change<CatalogItem>)>) {
        if self.items.finish_write(id, ack) {
            self.cascade_item(id);
        }
    }

    pub fn settle_list(&mut self, id: &ListId, ack: Option<(u64, Change<ShoppingList>)>) {
        if self.lists.finish_write(id, ack) {
            self.cascade_list(id);
        }
    }

    pub fn settle_membership(
        &mut self,
        id: &MembershipId,
        ack: Option<(u64, Change<ListMembership>)>,
    ) {
        self.memberships.finish_write(id, ack);
    }

    pub fn replace_items(&mut self, loaded: Loaded<CatalogItem>) -> usize {
        self.items.replace(unpack(loaded.records), loaded.seq)
    }

    pub fn replace_lists(&mut self, loaded: Loaded<ShoppingList>) -> usize {
        self.lists.replace(unpack(loaded.records), loaded.seq)
    }

    pub fn replace_memberships(&mut self, loaded: Loaded<ListMembership>) -> usize {
        self.memberships.replace(unpack(loaded.records), loaded.seq)
    }

    pub fn loading(&self) -> bool {
        self.loading > 0
    }

    pub fn begin_loading(&mut self) {
        self.loading += 1;
    }

    pub fn end_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

fn unpack<T>(records: Vec<Stored<T>>) -> Vec<(T, u64)> {
    records.into_iter().map(|s| (s.record, s.seq)).collect()
}

/// Store handle shared by the caller and the change-feed channels. Each
/// locked section is atomic; sequences of them are not.
#[derive(Clone, Default)]
pub struct SharedStore(Arc<Mutex<EntityStore>>);

impl SharedStore {
    pub fn new(store: EntityStore) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    pub fn lock(&self) -> MutexGuard<'_, EntityStore> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}

#[cfg(test)]
#[path = "tests/store/entity_store_tests.rs"]
mod tests;
