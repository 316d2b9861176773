use crate::error::{validate_price, validate_quantity};
use crate::model::{ItemId, MembershipId, MembershipPatch};
use crate::store::Change;

use super::*;

impl Carrinhos {
    /// Adds an item to a list. When the item is already in the list locally,
    /// the quantity is added to the existing entry and the price replaced.
    pub fn add_item_to_list(
        &self,
        list_id: &ListId,
        item_id: &ItemId,
        quantity: f64,
        price: f64,
    ) -> Result<ListMembership> {
        let quantity = validate_quantity(quantity)?;
        let price = validate_price(price)?;

        let existing = {
            let store = self.store.lock();
            if !store.lists().contains(list_id) {
                return Err(Error::UnknownRecord {
                    kind: "list",
                    id: list_id.to_string(),
                });
            }
            if !store.items().contains(item_id) {
                return Err(Error::UnknownRecord {
                    kind: "item",
                    id: item_id.to_string(),
                });
            }
            store
                .memberships()
                .records()
                .iter()
                .find(|m| &m.list_id == list_id && &m.item_id == item_id)
                .cloned()
        };

        if let Some(m) = existing {
            let patch = MembershipPatch {
                quantity: Some(m.quantity + quantity),
                price: Some(price),
                completed: None,
            };
            return self.update_list_item(&m.id, &patch);
        }

        let m = ListMembership::new(list_id.clone(), item_id.clone(), quantity, price);
        let id = m.id.clone();
        let stored = self.optimistic(
            |s| {
                s.memberships_mut().begin_write(&id);
                s.memberships_mut().upsert(m.clone());
            },
            |a| a.insert_membership(&m),
            |s, ack| {
                s.settle_membership(&id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone()))))
            },
        )?;
        Ok(stored.record)
    }

    pub fn update_list_item(
        &self,
        id: &MembershipId,
        patch: &MembershipPatch,
    ) -> Result<ListMembership> {
        let current = self.loaded_membership(id)?;
        if let Some(q) = patch.quantity {
            validate_quantity(q)?;
        }
        if let Some(p) = patch.price {
            validate_price(p)?;
        }
        if patch.is_empty() {
            return Ok(current);
        }
        let mut updated = current;
        patch.apply(&mut updated);

        let stored = self.optimistic(
            |s| {
                s.memberships_mut().begin_write(id);
                s.memberships_mut().upsert(updated.clone());
            },
            |a| a.update_membership(id, patch),
            |s, ack| {
                s.settle_membership(id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone()))))
            },
        )?;
        Ok(stored.record)
    }

    pub fn toggle_completed(&self, id: &MembershipId) -> Result<ListMembership> {
        let current = self.loaded_membership(id)?;
        let patch = MembershipPatch {
            completed: Some(!current.completed),
            ..MembershipPatch::default()
        };
        self.update_list_item(id, &patch)
    }

    pub fn remove_item_from_list(&self, id: &MembershipId) -> Result<()> {
        self.loaded_membership(id)?;
        self.optimistic(
            |s| {
                s.memberships_mut().begin_write(id);
                s.memberships_mut().remove(id);
            },
            |a| a.delete_membership(id),
            |s, ack| s.settle_membership(id, ack.map(|d| (d.seq, Change::Delete))),
        )?;
        Ok(())
    }

    fn loaded_membership(&self, id: &MembershipId) -> Result<ListMembership> {
        self.store
            .lock()
            .memberships()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownRecord {
                kind: "membership",
                id: id.to_string(),
            })
    }
}
