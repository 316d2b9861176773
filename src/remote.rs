use std::sync::Arc;
use std::time::Duration;

use crate::error::RemoteError;
use crate::model::{Identity, RemoteConfig};

mod http_client;
mod rest;

mod types;
pub use self::types::*;
mod adapter;
mod local;
mod rows;

pub use self::adapter::{Deleted, Loaded, Stored, SyncAdapter};
pub use self::local::LocalBackend;
pub use self::rows::{ItemRow, ListItemRow, ListRow, RowError, RowRecord};

/// The backend collaborator: three tables, a commit-ordered change-feed and
/// a credential check. Rows travel in backend shape.
pub trait Backend: Send + Sync {
    /// Full table read, newest first.
    fn select(&self, table: Table) -> Result<SelectResponse, RemoteError>;

    fn insert(&self, table: Table, row: Row) -> Result<VersionedRow, RemoteError>;

    /// Atomic insert that fails with [`RemoteError::Conflict`] when a row with
    /// the same values in `unique` already exists.
    fn insert_if_absent(
        &self,
        table: Table,
        row: Row,
        unique: &[&str],
    ) -> Result<VersionedRow, RemoteError>;

    fn update(&self, table: Table, id: &str, patch: Row) -> Result<VersionedRow, RemoteError>;

    fn delete(&self, table: Table, id: &str) -> Result<VersionedRow, RemoteError>;

    fn delete_where(
        &self,
        table: Table,
        column: &str,
        value: &str,
    ) -> Result<Vec<VersionedRow>, RemoteError>;

    /// Current head of the change-feed.
    fn head(&self) -> Result<u64, RemoteError>;

    /// Changes to `table` after `since`, waiting up to `wait` when none are pending.
    fn changes(&self, table: Table, since: u64, wait: Duration)
    -> Result<ChangeBatch, RemoteError>;

    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, RemoteError>;
}

pub type SharedBackend = Arc<dyn Backend>;

/// HTTP client for `carrinhos-server`.
pub struct RemoteClient {
    remote: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(remote: RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("carrinhos")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| RemoteError::Transport(format!("build reqwest client: {}", e)))?;
        Ok(Self { remote, client })
    }

    pub fn remote(&self) -> &RemoteConfig {
        &self.remote
    }
}
