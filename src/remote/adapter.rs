use super::rows::{item_patch_row, list_patch_row, membership_patch_row};
use super::*;
use crate::model::{
    CatalogItem, ItemId, ItemPatch, ListId, ListMembership, ListPatch, MembershipId,
    MembershipPatch, ShoppingList,
};

/// A full collection read, with the backend head it was taken at.
#[derive(Clone, Debug)]
pub struct Loaded<T> {
    pub records: Vec<Stored<T>>,
    pub seq: u64,
}

/// A record as acknowledged by the backend.
#[derive(Clone, Debug)]
pub struct Stored<T> {
    pub record: T,
    pub seq: u64,
}

/// Acknowledgement of a delete, including the memberships removed with it.
#[derive(Clone, Debug, Default)]
pub struct Deleted {
    pub seq: u64,
    pub memberships: Vec<(MembershipId, u64)>,
}

/// Typed view of a [`Backend`]: domain records in, domain records out.
#[derive(Clone)]
pub struct SyncAdapter {
    backend: SharedBackend,
}

impl SyncAdapter {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    pub fn load_items(&self) -> Result<Loaded<CatalogItem>, RemoteError> {
        self.load()
    }

    pub fn load_lists(&self) -> Result<Loaded<ShoppingList>, RemoteError> {
        self.load()
    }

    pub fn load_memberships(&self) -> Result<Loaded<ListMembership>, RemoteError> {
        self.load()
    }

    /// Reads a whole table. Rows that do not decode are logged and skipped.
    pub fn load<T: RowRecord>(&self) -> Result<Loaded<T>, RemoteError> {
        let resp = self.backend.select(T::TABLE)?;
        let mut records = Vec::with_capacity(resp.rows.len());
        for vr in resp.rows {
            match T::from_row(&vr.row) {
                Ok(record) => records.push(Stored {
                    record,
                    seq: vr.seq,
                }),
                Err(err) => {
                    tracing::warn!(table = %T::TABLE, id = vr.id().unwrap_or("?"), %err, "skipping undecodable row");
                }
            }
        }
        tracing::debug!(table = %T::TABLE, rows = records.len(), seq = resp.seq, "loaded table");
        Ok(Loaded {
            records,
            seq: resp.seq,
        })
    }

    pub fn insert_item(&self, item: &CatalogItem) -> Result<Stored<CatalogItem>, RemoteError> {
        self.insert(item)
    }

    pub fn insert_list(&self, list: &ShoppingList) -> Result<Stored<ShoppingList>, RemoteError> {
        self.insert(list)
    }

    pub fn insert_membership(
        &self,
        m: &ListMembership,
    ) -> Result<Stored<ListMembership>, RemoteError> {
        self.insert(m)
    }

    /// Inserts unless an item with the same name (case-insensitive) exists.
    pub fn insert_item_if_absent(
        &self,
        item: &CatalogItem,
    ) -> Result<Stored<CatalogItem>, RemoteError> {
        self.insert_unique(item, &["name"])
    }

    pub fn insert_list_if_absent(
        &self,
        list: &ShoppingList,
    ) -> Result<Stored<ShoppingList>, RemoteError> {
        self.insert_unique(list, &["name"])
    }

    pub fn insert_membership_if_absent(
        &self,
        m: &ListMembership,
    ) -> Result<Stored<ListMembership>, RemoteError> {
        self.insert_unique(m, &["list_id", "item_id"])
    }

    fn insert<T: RowRecord>(&self, record: &T) -> Result<Stored<T>, RemoteError> {
        let stored = self.backend.insert(T::TABLE, encode_record(record)?)?;
        decode_stored(stored)
    }

    fn insert_unique<T: RowRecord>(
        &self,
        record: &T,
        unique: &[&str],
    ) -> Result<Stored<T>, RemoteError> {
        let stored = self
            .backend
            .insert_if_absent(T::TABLE, encode_record(record)?, unique)?;
        decode_stored(stored)
    }

    pub fn update_item(
        &self,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> Result<Stored<CatalogItem>, RemoteError> {
        self.update(id.as_str(), item_patch_row(patch))
    }

    pub fn update_list(
        &self,
        id: &ListId,
        patch: &ListPatch,
    ) -> Result<Stored<ShoppingList>, RemoteError> {
        self.update(id.as_str(), list_patch_row(patch))
    }

    pub fn update_membership(
        &self,
        id: &MembershipId,
        patch: &MembershipPatch,
    ) -> Result<Stored<ListMembership>, RemoteError> {
        self.update(id.as_str(), membership_patch_row(patch))
    }

    fn update<T: RowRecord>(&self, id: &str, patch: Row) -> Result<Stored<T>, RemoteError> {
        let stored = self.backend.update(T::TABLE, id, patch)?;
        decode_stored(stored)
    }

    /// Deletes the item's memberships, then the item. The item is left in
    /// place when the memberships could not be deleted.
    pub fn delete_item(&self, id: &ItemId) -> Result<Deleted, RemoteError> {
        self.delete_cascading(Table::Item, "item_id", id.as_str())
    }

    /// Deletes the list's memberships, then the list.
    pub fn delete_list(&self, id: &ListId) -> Result<Deleted, RemoteError> {
        self.delete_cascading(Table::ShoppingList, "list_id", id.as_str())
    }

    pub fn delete_membership(&self, id: &MembershipId) -> Result<Deleted, RemoteError> {
        let gone = self.backend.delete(Table::ListItem, id.as_str())?;
        Ok(Deleted {
            seq: gone.seq,
            memberships: Vec::new(),
        })
    }

    fn delete_cascading(
        &self,
        table: Table,
        column: &str,
        id: &str,
    ) -> Result<Deleted, RemoteError> {
        let dependents = self.backend.delete_where(Table::ListItem, column, id)?;
        let memberships: Vec<(MembershipId, u64)> = dependents
            .iter()
            .filter_map(|vr| vr.id().map(|mid| (MembershipId::from(mid), vr.seq)))
            .collect();
        tracing::debug!(%table, id, memberships = memberships.len(), "deleted dependent memberships");

        let gone = self.backend.delete(table, id)?;
        Ok(Deleted {
            seq: gone.seq,
            memberships,
        })
    }
}

fn encode_record<T: RowRecord>(record: &T) -> Result<Row, RemoteError> {
    record.to_row().map_err(|e| RemoteError::Encode(e.to_string()))
}

fn decode_stored<T: RowRecord>(stored: VersionedRow) -> Result<Stored<T>, RemoteError> {
    let record = T::from_row(&stored.row).map_err(|e| RemoteError::Decode(e.to_string()))?;
    Ok(Stored {
        record,
        seq: stored.seq,
    })
}

#[cfg(test)]
#[path = "../tests/remote/adapter_tests.rs"]
mod tests;
