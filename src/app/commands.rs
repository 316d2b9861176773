use crate::command::{CommandResult, Created, Creation, DeferredAction, Step, plan};
use crate::store::Change;

use super::*;

impl Carrinhos {
    /// Interprets one line of user input. Items and lists are refreshed
    /// first, each on its own; a failed refresh leaves the error flag set and
    /// interpretation runs against whatever is loaded.
    pub fn process_command(&self, text: &str) -> CommandResult {
        let refreshed = [self.load_items(), self.load_lists()];
        if let Some(err) = refreshed.into_iter().find_map(|r| r.err()) {
            tracing::debug!(%err, "refresh before command failed");
            // The second load clears the flag when it succeeds.
            self.store.lock().set_error(err.to_string());
        }

        let creation = match plan(text, &self.snapshot()) {
            Step::Reply(reply) => return reply,
            Step::Create(creation) => creation,
        };
        let outcome = self.create(&creation);
        if let Err(err) = &outcome
            && err.is_conflict()
        {
            self.clear_error();
        }
        creation.finish(outcome)
    }

    /// Carries out a confirmed delete. Edit actions have nothing to apply
    /// here; callers follow them with `update_item` or `update_list`.
    pub fn confirm_delete(&self, action: &DeferredAction) -> Result<()> {
        match action {
            DeferredAction::DeleteItem(item) => self.delete_item(&item.id),
            DeferredAction::DeleteList(list) => self.delete_list(&list.id),
            DeferredAction::EditItem(_) | DeferredAction::EditList(_) => {
                tracing::debug!(?action, "edit action needs no confirmation");
                Ok(())
            }
        }
    }

    /// Unique-key insert for interpreter creations. A conflict removes the
    /// optimistic record again.
    fn create(&self, creation: &Creation) -> Result<Created> {
        match creation {
            Creation::List { name } => {
                let list = ShoppingList::new(name, None, self.owner.clone());
                let id = list.id.clone();
                let out = self.optimistic(
                    |s| {
                        s.lists_mut().begin_write(&id);
                        s.lists_mut().upsert(list.clone());
                    },
                    |a| a.insert_list_if_absent(&list),
                    |s, ack| {
                        s.settle_list(&id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone()))))
                    },
                );
                self.drop_on_conflict(&out, |s| {
                    s.lists_mut().remove(&id);
                });
                Ok(Created::List(out?.record))
            }
            Creation::Item {
                name,
                category,
                unit,
            } => {
                let item = CatalogItem::new(name, category, *unit, self.owner.clone());
                let id = item.id.clone();
                let out = self.optimistic(
                    |s| {
                        s.items_mut().begin_write(&id);
                        s.items_mut().upsert(item.clone());
                    },
                    |a| a.insert_item_if_absent(&item),
                    |s, ack| {
                        s.settle_item(&id, ack.map(|st| (st.seq, Change::Upsert(st.record.clone()))))
                    },
                );
                self.drop_on_conflict(&out, |s| {
                    s.items_mut().remove(&id);
                });
                Ok(Created::Item(out?.record))
            }
            Creation::Membership { item, list } => {
                let m = ListMembership::new(list.id.clone(), item.id.clone(), 1.0, 0.0);
                let id = m.id.clone();
                let out = self.optimistic(
                    |s| {
                        s.memberships_mut().begin_write(&id);
                        s.memberships_mut().upsert(m.clone());
                    },
                    |a| a.insert_membership_if_absent(&m),
                    |s, ack| {
                        s.settle_membership(
                            &id,
                            ack.map(|st| (st.seq, Change::Upsert(st.record.clone()))),
                        )
                    },
                );
                self.drop_on_conflict(&out, |s| {
                    s.memberships_mut().remove(&id);
                });
                Ok(Created::Membership(out?.record))
            }
        }
    }

    fn drop_on_conflict<T>(&self, out: &Result<T>, undo: impl FnOnce(&mut EntityStore)) {
        if let Err(err) = out
            && err.is_conflict()
        {
            undo(&mut self.store.lock());
        }
    }
}
