use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::hash::Hash;

use time::OffsetDateTime;

use crate::model::{CatalogItem, ItemId, ListId, ListMembership, MembershipId, ShoppingList};

/// A record kept in an [`Collection`].
pub trait Record: Clone {
    type Id: Clone + Eq + Hash + Ord + std::fmt::Display;

    const KIND: &'static str;

    fn id(&self) -> &Self::Id;

    fn created_at(&self) -> OffsetDateTime;
}

impl Record for CatalogItem {
    type Id = ItemId;
    const KIND: &'static str = "item";

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for ShoppingList {
    type Id = ListId;
    const KIND: &'static str = "list";

    fn id(&self) -> &ListId {
        &self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for ListMembership {
    type Id = MembershipId;
    const KIND: &'static str = "membership";

    fn id(&self) -> &MembershipId {
        &self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// A backend-originated change to one record.
#[derive(Clone, Debug)]
pub enum Change<R> {
    Upsert(R),
    Delete,
}

/// Outcome of a versioned merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Merge {
    Applied,
    /// Older than the reconciled version; dropped.
    Stale,
    /// The id has an unacknowledged local write; applied once it settles.
    Held,
}

#[derive(Clone, Copy, Debug)]
struct Version {
    seq: u64,
    deleted: bool,
}

struct Pending<R> {
    writes: u32,
    held: Option<(u64, Change<R>)>,
}

/// One keyed collection, newest first by `created_at` (ties by id).
pub struct Collection<R: Record> {
    records: Vec<R>,
    versions: HashMap<R::Id, Version>,
    pending: HashMap<R::Id, Pending<R>>,
    /// Head of the newest full reload. Tombstones at or below it are
    /// dropped; an id without a version counts as deleted up to here.
    floor: u64,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            versions: HashMap::new(),
            pending: HashMap::new(),
            floor: 0,
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.get(id).is_some()
    }

    /// Reconciled backend version of `id`, if any change to it has been seen.
    pub fn version(&self, id: &R::Id) -> Option<u64> {
        self.versions.get(id).map(|v| v.seq)
    }

    pub fn has_pending_write(&self, id: &R::Id) -> bool {
        self.pending.contains_key(id)
    }

    /// Unversioned upsert (optimistic local writes and plain merges).
    pub fn upsert(&mut self, record: R) {
        if let Some(idx) = self.position(record.id()) {
            self.records.remove(idx);
        }
        let key = sort_key(&record);
        let at = self
            .records
            .partition_point(|r| sort_key(r).cmp(&key) == Ordering::Less);
        self.records.insert(at, record);
    }

    pub fn upsert_many(&mut self, records: impl IntoIterator<Item = R>) {
        for r in records {
            self.upsert(r);
        }
    }

    pub fn remove(&mut self, id: &R::Id) -> Option<R> {
        let idx = self.position(id)?;
        Some(self.records.remove(idx))
    }

    /// Removes every record matching `pred`, returning them.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&R) -> bool) -> Vec<R> {
        let mut removed = Vec::new();
        self.records.retain(|r| {
            if pred(r) {
                removed.push(r.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Merges a backend change committed at `seq`.
    pub fn merge(&mut self, id: &R::Id, change: Change<R>, seq: u64) -> Merge {
        if self.is_stale(id, seq) {
            return Merge::Stale;
        }
        if let Some(p) = self.pending.get_mut(id) {
            if p.held.as_ref().is_none_or(|(held_seq, _)| *held_seq <= seq) {
                p.held = Some((seq, change));
            }
            return Merge::Held;
        }
        self.apply(id, change, seq);
        Merge::Applied
    }

    /// Marks the start of an optimistic local write to `id`.
    pub fn begin_write(&mut self, id: &R::Id) {
        self.pending
            .entry(id.clone())
            .or_insert(Pending {
                writes: 0,
                held: None,
            })
            .writes += 1;
    }

    /// Settles a local write. `ack` is the backend's acknowledgement, or
    /// `None` when the write failed. Returns true when the settled state has
    /// the record deleted.
    pub fn finish_write(&mut self, id: &R::Id, ack: Option<(u64, Change<R>)>) -> bool {
        let Some(p) = self.pending.get_mut(id) else {
            if let Some((seq, change)) = ack
                && !self.is_stale(id, seq)
            {
                self.apply(id, change, seq);
            }
            return !self.contains(id);
        };
        p.writes = p.writes.saturating_sub(1);
        let still_pending = p.writes > 0;

        if let Some((seq, change)) = ack {
            if still_pending {
                // A later optimistic write owns the local record; keep its value.
                self.bump_version(id, seq, matches!(change, Change::Delete));
            } else if !self.is_stale(id, seq) {
                self.apply(id, change, seq);
            }
        }

        if !still_pending
            && let Some(p) = self.pending.remove(id)
            && let Some((seq, change)) = p.held
            && !self.is_stale(id, seq)
        {
            self.apply(id, change, seq);
        }
        !self.contains(id)
    }

    /// Full reload reconciliation against a snapshot taken at `head`.
    pub fn replace(&mut self, fresh: Vec<(R, u64)>, head: u64) -> usize {
        let mut seen = Vec::with_capacity(fresh.len());
        for (record, seq) in fresh {
            let id = record.id().clone();
            self.merge(&id, Change::Upsert(record), seq);
            seen.push(id);
        }
        seen.sort();

        let versions = &self.versions;
        let pending = &self.pending;
        let dropped = self.records.len();
        self.records.retain(|r| {
            let id = r.id();
            seen.binary_search(id).is_ok()
                || pending.contains_key(id)
                || versions.get(id).is_some_and(|v| v.seq > head)
        });
        let dropped = dropped - self.records.len();

        // Every row alive at `head` was in `fresh`, so an unversioned id
        // is deleted up to `head` and needs no tombstone of its own.
        self.floor = self.floor.max(head);
        let floor = self.floor;
        self.versions.retain(|id, v| {
            let absent = !pending.contains_key(id) && seen.binary_search(id).is_err();
            !(absent && v.seq <= floor && (v.deleted || v.seq <= head))
        });
        dropped
    }

    /// Number of ids with a reconciled version, tombstones included.
    pub fn tracked_versions(&self) -> usize {
        self.versions.len()
    }

    fn is_stale(&self, id: &R::Id, seq: u64) -> bool {
        match self.versions.get(id) {
            Some(v) => v.seq > seq,
            None => seq <= self.floor,
        }
    }

    fn apply(&mut self, id: &R::Id, change: Change<R>, seq: u64) {
        match change {
            Change::Upsert(record) => {
                self.upsert(record);
                self.bump_version(id, seq, false);
            }
            Change::Delete => {
                self.remove(id);
                self.bump_version(id, seq, true);
            }
        }
    }

    fn bump_version(&mut self, id: &R::Id, seq: u64, deleted: bool) {
        let v = self
            .versions
            .entry(id.clone())
            .or_insert(Version { seq, deleted });
        if seq >= v.seq {
            *v = Version { seq, deleted };
        }
    }

    fn position(&self, id: &R::Id) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

fn sort_key<R: Record>(r: &R) -> (Reverse<OffsetDateTime>, R::Id) {
    (Reverse(r.created_at()), r.id().clone())
}
