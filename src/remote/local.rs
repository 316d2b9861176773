use crate::db::{Database, DbError};

use super::*;

const CHANGE_BATCH_LIMIT: usize = 500;

/// Backend running in-process on a [`Database`]; used by tests and by
/// clients that work without a server.
#[derive(Clone)]
pub struct LocalBackend {
    db: Arc<Database>,
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new(Arc::new(Database::default()))
    }
}

impl LocalBackend {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

impl From<DbError> for RemoteError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => RemoteError::NotFound(err.to_string()),
            DbError::Conflict(msg) => RemoteError::Conflict(msg),
            DbError::Invalid(msg) => RemoteError::Rejected {
                status: 400,
                message: msg,
            },
            DbError::Entropy(_) => RemoteError::Rejected {
                status: 500,
                message: err.to_string(),
            },
        }
    }
}

impl Backend for LocalBackend {
    fn select(&self, table: Table) -> Result<SelectResponse, RemoteError> {
        let (rows, seq) = self.db.select(table);
        Ok(SelectResponse { rows, seq })
    }

    fn insert(&self, table: Table, row: Row) -> Result<VersionedRow, RemoteError> {
        Ok(self.db.insert(table, row)?)
    }

    fn insert_if_absent(
        &self,
        table: Table,
        row: Row,
        unique: &[&str],
    ) -> Result<VersionedRow, RemoteError> {
        Ok(self.db.insert_if_absent(table, row, unique)?)
    }

    fn update(&self, table: Table, id: &str, patch: Row) -> Result<VersionedRow, RemoteError> {
        Ok(self.db.update(table, id, patch)?)
    }

    fn delete(&self, table: Table, id: &str) -> Result<VersionedRow, RemoteError> {
        Ok(self.db.delete(table, id)?)
    }

    fn delete_where(
        &self,
        table: Table,
        column: &str,
        value: &str,
    ) -> Result<Vec<VersionedRow>, RemoteError> {
        Ok(self.db.delete_where(table, column, value)?)
    }

    fn head(&self) -> Result<u64, RemoteError> {
        Ok(self.db.head())
    }

    fn changes(
        &self,
        table: Table,
        since: u64,
        wait: Duration,
    ) -> Result<ChangeBatch, RemoteError> {
        Ok(self
            .db
            .wait_changes(Some(table), since, CHANGE_BATCH_LIMIT, wait))
    }

    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, RemoteError> {
        Ok(self.db.verify_credentials(email, password))
    }
}
