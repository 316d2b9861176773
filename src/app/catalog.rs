use crate::error::{ValidationError, validate_name};
use crate::model::{DEFAULT_CATEGORY, ItemId, ItemPatch, ListPatch, Unit};
use crate::remote::Deleted;
use crate::store::Change;

use super::*;

impl Carrinhos {
    pub fn add_item(&self, name: &str, category: &str, unit: Unit) -> Result<CatalogItem> {
        let name = validate_name(name)?;
        if self.snapshot().item_named(&name).is_some() {
            return Err(ValidationError::Duplicate(name).into());
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        let item = CatalogItem::new(&name, category, unit, self.owner.clone());
        let id = item.id.clone();

        let stored = self.optimistic(
            |s| {
                s.items_mut().begin_write(&id);
                s.items_mut().upsert(item.clone());
            },
            |a| a.insert_item(&item),
            |s, ack| s.settle_item(&id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone())))),
        )?;
        Ok(stored.record)
    }

    pub fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> Result<CatalogItem> {
        let current = self.loaded_item(id)?;
        let mut patch = patch.clone();
        if let Some(name) = &patch.name {
            let name = validate_name(name)?;
            if let Some(other) = self.snapshot().item_named(&name)
                && &other.id != id
            {
                return Err(ValidationError::Duplicate(name).into());
            }
            patch.name = Some(name);
        }
        if patch.is_empty() {
            return Ok(current);
        }
        let mut updated = current;
        patch.apply(&mut updated);

        let stored = self.optimistic(
            |s| {
                s.items_mut().begin_write(id);
                s.items_mut().upsert(updated.clone());
            },
            |a| a.update_item(id, &patch),
            |s, ack| s.settle_item(id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone())))),
        )?;
        Ok(stored.record)
    }

    /// Removes the item and its memberships locally, then remotely
    /// (memberships first).
    pub fn delete_item(&self, id: &ItemId) -> Result<()> {
        self.loaded_item(id)?;
        self.optimistic(
            |s| {
                s.items_mut().begin_write(id);
                s.items_mut().remove(id);
                s.cascade_item(id);
            },
            |a| a.delete_item(id),
            |s, ack| {
                s.settle_item(id, ack.map(|d| (d.seq, Change::Delete)));
                settle_cascade(s, ack);
            },
        )?;
        Ok(())
    }

    pub fn add_list(&self, name: &str, description: Option<&str>) -> Result<ShoppingList> {
        let name = validate_name(name)?;
        if self.snapshot().list_named(&name).is_some() {
            return Err(ValidationError::Duplicate(name).into());
        }
        let description = description.map(|d| d.trim().to_string());
        let list = ShoppingList::new(&name, description, self.owner.clone());
        let id = list.id.clone();

        let stored = self.optimistic(
            |s| {
                s.lists_mut().begin_write(&id);
                s.lists_mut().upsert(list.clone());
            },
            |a| a.insert_list(&list),
            |s, ack| s.settle_list(&id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone())))),
        )?;
        Ok(stored.record)
    }

    pub fn update_list(&self, id: &ListId, patch: &ListPatch) -> Result<ShoppingList> {
        let current = self.loaded_list(id)?;
        let mut patch = patch.clone();
        if let Some(name) = &patch.name {
            let name = validate_name(name)?;
            if let Some(other) = self.snapshot().list_named(&name)
                && &other.id != id
            {
                return Err(ValidationError::Duplicate(name).into());
            }
            patch.name = Some(name);
        }
        if let Some(Some(d)) = &patch.description {
            let d = d.trim();
            patch.description = Some((!d.is_empty()).then(|| d.to_string()));
        }
        if patch.is_empty() {
            return Ok(current);
        }
        let mut updated = current;
        patch.apply(&mut updated);

        let stored = self.optimistic(
            |s| {
                s.lists_mut().begin_write(id);
                s.lists_mut().upsert(updated.clone());
            },
            |a| a.update_list(id, &patch),
            |s, ack| s.settle_list(id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone())))),
        )?;
        Ok(stored.record)
    }

    /// Removes the list and its memberships; catalog items stay.
    pub fn delete_list(&self, id: &ListId) -> Result<()> {
        self.loaded_list(id)?;
        self.optimistic(
            |s| {
                s.lists_mut().begin_write(id);
                s.lists_mut().remove(id);
                s.cascade_list(id);
            },
            |a| a.delete_list(id),
            |s, ack| {
                s.settle_list(id, ack.map(|d| (d.seq, Change::Delete)));
                settle_cascade(s, ack);
            },
        )?;
        Ok(())
    }

    fn loaded_item(&self, id: &ItemId) -> Result<CatalogItem> {
        self.store
            .lock()
            .items()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownRecord {
                kind: "item",
                id: id.to_string(),
            })
    }

    fn loaded_list(&self, id: &ListId) -> Result<ShoppingList> {
        self.store
            .lock()
            .lists()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownRecord {
                kind: "list",
                id: id.to_string(),
            })
    }
}

/// Records the versions of memberships the backend deleted with a parent.
fn settle_cascade(s: &mut EntityStore, ack: Option<&Deleted>) {
    for (mid, seq) in ack.map(|d| d.memberships.as_slice()).unwrap_or_default() {
        s.merge_membership(mid, Change::Delete, *seq);
    }
}
