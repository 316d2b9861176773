//! Read-only views over a [`Snapshot`]. References to records that are not
//! loaded yet are treated as absent.

use crate::model::{CatalogItem, ItemId, ListId, ListMembership, ShoppingList, Unit};

/// Point-in-time copy of the three collections, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub items: Vec<CatalogItem>,
    pub lists: Vec<ShoppingList>,
    pub memberships: Vec<ListMembership>,
}

/// A membership joined to its catalog item.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryView {
    pub membership: ListMembership,
    pub item: CatalogItem,
}

impl EntryView {
    pub fn unit(&self) -> Unit {
        self.item.unit
    }

    pub fn subtotal(&self) -> f64 {
        self.membership.subtotal()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub entries: Vec<EntryView>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListSummary {
    pub entries: usize,
    pub completed: usize,
    /// Sum of price × quantity.
    pub total: f64,
}

impl Snapshot {
    pub fn item(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn list(&self, id: &ListId) -> Option<&ShoppingList> {
        self.lists.iter().find(|l| &l.id == id)
    }

    /// Case-insensitive exact name lookup.
    pub fn item_named(&self, name: &str) -> Option<&CatalogItem> {
        let name = name.trim().to_lowercase();
        self.items.iter().find(|i| i.name.to_lowercase() == name)
    }

    pub fn list_named(&self, name: &str) -> Option<&ShoppingList> {
        let name = name.trim().to_lowercase();
        self.lists.iter().find(|l| l.name.to_lowercase() == name)
    }

    pub fn memberships_for(&self, list_id: &ListId) -> Vec<&ListMembership> {
        self.memberships
            .iter()
            .filter(|m| &m.list_id == list_id)
            .collect()
    }

    pub fn membership(&self, list_id: &ListId, item_id: &ItemId) -> Option<&ListMembership> {
        self.memberships
            .iter()
            .find(|m| &m.list_id == list_id && &m.item_id == item_id)
    }

    /// Entries of a list whose item is loaded, in membership order.
    pub fn entries(&self, list_id: &ListId) -> Vec<EntryView> {
        self.memberships_for(list_id)
            .into_iter()
            .filter_map(|m| {
                let item = self.item(&m.item_id)?;
                Some(EntryView {
                    membership: m.clone(),
                    item: item.clone(),
                })
            })
            .collect()
    }

    /// Totals over [`Snapshot::entries`], so memberships of items that are
    /// not loaded yet are left out.
    pub fn list_summary(&self, list_id: &ListId) -> ListSummary {
        let entries = self.entries(list_id);
        ListSummary {
            entries: entries.len(),
            completed: entries.iter().filter(|e| e.membership.completed).count(),
            total: entries.iter().map(EntryView::subtotal).sum(),
        }
    }

    /// Entries grouped by item category, groups in order of first appearance.
    /// Empty when the list itself is not loaded.
    pub fn grouped_by_category(&self, list_id: &ListId) -> Vec<CategoryGroup> {
        if self.list(list_id).is_none() {
            return Vec::new();
        }
        let mut groups: Vec<CategoryGroup> = Vec::new();
        for entry in self.entries(list_id) {
            match groups
                .iter_mut()
                .find(|g| g.category == entry.item.category)
            {
                Some(g) => g.entries.push(entry),
                None => groups.push(CategoryGroup {
                    category: entry.item.category.clone(),
                    entries: vec![entry],
                }),
            }
        }
        groups
    }

    /// Items whose name or category contains `term` (case-insensitive).
    pub fn search_items(&self, term: &str) -> Vec<&CatalogItem> {
        let term = term.trim().to_lowercase();
        self.items
            .iter()
            .filter(|i| {
                term.is_empty()
                    || i.name.to_lowercase().contains(&term)
                    || i.category.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Distinct loaded lists that hold `item_id`.
    pub fn linked_lists(&self, item_id: &ItemId) -> Vec<&ShoppingList> {
        let mut out: Vec<&ShoppingList> = Vec::new();
        for m in self.memberships.iter().filter(|m| &m.item_id == item_id) {
            if let Some(list) = self.list(&m.list_id)
                && !out.iter().any(|l| l.id == list.id)
            {
                out.push(list);
            }
        }
        out
    }

    /// Catalog items not yet in `list_id`, filtered by `term`.
    pub fn available_items(&self, list_id: &ListId, term: &str) -> Vec<&CatalogItem> {
        self.search_items(term)
            .into_iter()
            .filter(|i| self.membership(list_id, &i.id).is_none())
            .collect()
    }
}
