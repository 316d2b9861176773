//! In-process relational table engine backing `carrinhos-server` and
//! [`crate::remote::LocalBackend`].
//!
//! Every write is assigned a strictly increasing commit sequence number and
//! appended to a bounded change log that change-feed readers poll (or block
//! on) by cursor.

use std::collections::BTreeMap;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::Identity;
use crate::remote::{ChangeBatch, ChangeEvent, ChangeKind, Row, Table, VersionedRow};

mod changelog;
mod users;

use self::changelog::ChangeLog;
pub use self::users::UserRecord;

pub const DEFAULT_LOG_CAPACITY: usize = 10_000;
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DbError {
    #[error("{table} row {id} not found")]
    NotFound { table: Table, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

/// Durable part of the database, as written to disk by the server.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DbSnapshot {
    pub version: u32,
    pub seq: u64,
    pub tables: BTreeMap<Table, Vec<VersionedRow>>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

struct DbState {
    seq: u64,
    tables: BTreeMap<Table, Vec<VersionedRow>>,
    users: Vec<UserRecord>,
    log: ChangeLog,
}

pub struct Database {
    state: Mutex<DbState>,
    changed: Condvar,
}

impl Default for Database {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl Database {
    pub fn new(log_capacity: usize) -> Self {
        let tables = Table::ALL.into_iter().map(|t| (t, Vec::new())).collect();
        Self {
            state: Mutex::new(DbState {
                seq: 0,
                tables,
                users: Vec::new(),
                log: ChangeLog::new(log_capacity, 0),
            }),
            changed: Condvar::new(),
        }
    }

    /// Restores a persisted snapshot. The change log starts empty, so readers
    /// holding an older cursor are told to resync.
    pub fn from_snapshot(snapshot: DbSnapshot, log_capacity: usize) -> Result<Self, DbError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DbError::Invalid(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        let mut tables = snapshot.tables;
        for t in Table::ALL {
            tables.entry(t).or_default();
        }
        Ok(Self {
            state: Mutex::new(DbState {
                seq: snapshot.seq,
                tables,
                users: snapshot.users,
                log: ChangeLog::new(log_capacity, snapshot.seq),
            }),
            changed: Condvar::new(),
        })
    }

    pub fn snapshot(&self) -> DbSnapshot {
        let st = self.lock();
        DbSnapshot {
            version: SNAPSHOT_VERSION,
            seq: st.seq,
            tables: st.tables.clone(),
            users: st.users.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DbState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn head(&self) -> u64 {
        self.lock().seq
    }

    /// All rows of a table, newest first by `created_at`, plus the head seq.
    pub fn select(&self, table: Table) -> (Vec<VersionedRow>, u64) {
        let st = self.lock();
        let mut rows = st.tables.get(&table).cloned().unwrap_or_default();
        rows.sort_by(|a, b| created_at_key(&b.row).cmp(&created_at_key(&a.row)));
        (rows, st.seq)
    }

    pub fn insert(&self, table: Table, row: Row) -> Result<VersionedRow, DbError> {
        self.insert_checked(table, row, &[])
    }

    /// Inserts unless a row with equal values in every `unique` column exists.
    /// Text values compare trimmed and case-insensitively.
    pub fn insert_if_absent(
        &self,
        table: Table,
        row: Row,
        unique: &[&str],
    ) -> Result<VersionedRow, DbError> {
        if unique.is_empty() {
            return Err(DbError::Invalid("conditional insert needs a key".to_string()));
        }
        self.insert_checked(table, row, unique)
    }

    fn insert_checked(
        &self,
        table: Table,
        row: Row,
        unique: &[&str],
    ) -> Result<VersionedRow, DbError> {
        validate_columns(table, &row)?;
        for col in unique {
            if !table.columns().contains(col) {
                return Err(DbError::Invalid(format!("unknown column {}.{}", table, col)));
            }
        }
        let id = row_id(&row)
            .ok_or_else(|| DbError::Invalid(format!("{} row without id", table)))?
            .to_string();

        let mut st = self.lock();
        if find_row(&st, table, &id).is_some() {
            return Err(DbError::Conflict(format!("{} {} already exists", table, id)));
        }
        if !unique.is_empty() {
            let rows = st.tables.get(&table).map(Vec::as_slice).unwrap_or_default();
            if rows.iter().any(|r| unique.iter().all(|c| same_value(&r.row, &row, c))) {
                return Err(DbError::Conflict(format!(
                    "{} with the same {} already exists",
                    table,
                    unique.join(", ")
                )));
            }
        }
        check_references(&st, table, &row)?;

        st.seq += 1;
        let stored = VersionedRow { seq: st.seq, row };
        rows_mut(&mut st, table).push(stored.clone());
        let event = ChangeEvent {
            seq: st.seq,
            table,
            kind: ChangeKind::Insert,
            new: Some(stored.row.clone()),
            old: None,
        };
        st.log.push(event);
        drop(st);
        self.changed.notify_all();
        Ok(stored)
    }

    pub fn update(&self, table: Table, id: &str, patch: Row) -> Result<VersionedRow, DbError> {
        validate_columns(table, &patch)?;
        if let Some(new_id) = row_id(&patch)
            && new_id != id
        {
            return Err(DbError::Invalid("row id cannot change".to_string()));
        }

        let mut st = self.lock();
        let Some(idx) = find_row(&st, table, id) else {
            return Err(DbError::NotFound {
                table,
                id: id.to_string(),
            });
        };
        let mut candidate = rows_mut(&mut st, table)[idx].row.clone();
        for (k, v) in patch {
            candidate.insert(k, v);
        }
        check_references(&st, table, &candidate)?;

        st.seq += 1;
        let seq = st.seq;
        let slot = &mut rows_mut(&mut st, table)[idx];
        let old = std::mem::replace(&mut slot.row, candidate);
        slot.seq = seq;
        let stored = slot.clone();
        st.log.push(ChangeEvent {
            seq,
            table,
            kind: ChangeKind::Update,
            new: Some(stored.row.clone()),
            old: Some(old),
        });
        drop(st);
        self.changed.notify_all();
        Ok(stored)
    }

    pub fn delete(&self, table: Table, id: &str) -> Result<VersionedRow, DbError> {
        let mut st = self.lock();
        let Some(idx) = find_row(&st, table, id) else {
            return Err(DbError::NotFound {
                table,
                id: id.to_string(),
            });
        };
        if let Some(column) = referencing_column(table) {
            let referenced = rows_mut(&mut st, Table::ListItem)
                .iter()
                .any(|r| r.row.get(column).and_then(Value::as_str) == Some(id));
            if referenced {
                return Err(DbError::Conflict(format!(
                    "{} {} is still referenced by list_item.{}",
                    table, id, column
                )));
            }
        }
        let removed = remove_at(&mut st, table, idx);
        drop(st);
        self.changed.notify_all();
        Ok(removed)
    }

    /// Deletes every row whose `column` equals `value`.
    pub fn delete_where(
        &self,
        table: Table,
        column: &str,
        value: &str,
    ) -> Result<Vec<VersionedRow>, DbError> {
        if !table.columns().contains(&column) {
            return Err(DbError::Invalid(format!("unknown column {}.{}", table, column)));
        }
        if table != Table::ListItem {
            return Err(DbError::Invalid(format!(
                "bulk delete is only supported on {}",
                Table::ListItem
            )));
        }

        let mut st = self.lock();
        let mut removed = Vec::new();
        loop {
            let Some(idx) = rows_mut(&mut st, table)
                .iter()
                .position(|r| r.row.get(column).and_then(Value::as_str) == Some(value))
            else {
                break;
            };
            removed.push(remove_at(&mut st, table, idx));
        }
        drop(st);
        if !removed.is_empty() {
            self.changed.notify_all();
        }
        Ok(removed)
    }

    /// Changes committed after `since`, optionally restricted to one table.
    pub fn changes(&self, table: Option<Table>, since: u64, limit: usize) -> ChangeBatch {
        let st = self.lock();
        st.log.read(table, since, limit, st.seq)
    }

    /// Like [`Database::changes`] but blocks up to `wait` for something to report.
    pub fn wait_changes(
        &self,
        table: Option<Table>,
        since: u64,
        limit: usize,
        wait: Duration,
    ) -> ChangeBatch {
        let deadline = Instant::now() + wait;
        let mut st = self.lock();
        loop {
            let batch = st.log.read(table, since, limit, st.seq);
            let now = Instant::now();
            if !batch.events.is_empty() || batch.resync || now >= deadline {
                return batch;
            }
            st = self
                .changed
                .wait_timeout(st, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    pub fn add_user(&self, email: &str, password: &str, name: &str) -> Result<Identity, DbError> {
        let mut st = self.lock();
        if st
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email.trim()))
        {
            return Err(DbError::Conflict(format!("user {} already exists", email)));
        }
        let user = UserRecord::new(email, password, name)?;
        let identity = user.identity();
        st.users.push(user);
        Ok(identity)
    }

    pub fn verify_credentials(&self, email: &str, password: &str) -> Option<Identity> {
        let st = self.lock();
        st.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .filter(|u| u.verify(password))
            .map(UserRecord::identity)
    }
}

fn validate_columns(table: Table, row: &Row) -> Result<(), DbError> {
    let columns = table.columns();
    for key in row.keys() {
        if !columns.contains(&key.as_str()) {
            return Err(DbError::Invalid(format!("unknown column {}.{}", table, key)));
        }
    }
    Ok(())
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn find_row(st: &DbState, table: Table, id: &str) -> Option<usize> {
    st.tables
        .get(&table)?
        .iter()
        .position(|r| row_id(&r.row) == Some(id))
}

fn same_value(a: &Row, b: &Row, column: &str) -> bool {
    match (a.get(column), b.get(column)) {
        (Some(Value::String(x)), Some(Value::String(y))) => {
            x.trim().to_lowercase() == y.trim().to_lowercase()
        }
        (x, y) => x == y,
    }
}

/// Column of `list_item` that references rows of `table`, if any.
fn referencing_column(table: Table) -> Option<&'static str> {
    match table {
        Table::Item => Some("item_id"),
        Table::ShoppingList => Some("list_id"),
        Table::ListItem => None,
    }
}

fn check_references(st: &DbState, table: Table, row: &Row) -> Result<(), DbError> {
    if table != Table::ListItem {
        return Ok(());
    }
    for (column, parent) in [("list_id", Table::ShoppingList), ("item_id", Table::Item)] {
        let Some(target) = row.get(column).and_then(Value::as_str) else {
            return Err(DbError::Invalid(format!("list_item.{} is required", column)));
        };
        if find_row(st, parent, target).is_none() {
            return Err(DbError::Invalid(format!(
                "list_item.{} references missing {} {}",
                column, parent, target
            )));
        }
    }
    Ok(())
}

fn remove_at(st: &mut DbState, table: Table, idx: usize) -> VersionedRow {
    st.seq += 1;
    let seq = st.seq;
    let old = rows_mut(st, table).remove(idx);
    st.log.push(ChangeEvent {
        seq,
        table,
        kind: ChangeKind::Delete,
        new: None,
        old: Some(old.row.clone()),
    });
    VersionedRow { seq, row: old.row }
}

fn rows_mut(st: &mut DbState, table: Table) -> &mut Vec<VersionedRow> {
    st.tables.entry(table).or_default()
}

fn created_at_key(row: &Row) -> (i128, String) {
    let raw = row
        .get("created_at")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let nanos = time::OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339)
        .map(|t| t.unix_timestamp_nanos())
        .unwrap_or(i128::MIN);
    (nanos, raw.to_string())
}

#[cfg(test)]
#[path = "tests/db/database_tests.rs"]
mod tests;
