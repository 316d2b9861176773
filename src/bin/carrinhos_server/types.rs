use super::*;

#[derive(Clone)]
pub(super) struct AppState {
    pub(super) db: Arc<Database>,
    pub(super) data_dir: PathBuf,

    // Stored hash of the bearer API key.
    pub(super) api_key_hash: String,

    /// Serializes snapshot writes so an older snapshot never lands last.
    pub(super) persist_lock: Arc<std::sync::Mutex<()>>,
}

pub(super) fn hash_api_key(key: &str) -> String {
    blake3::hash(key.as_bytes()).to_hex().to_string()
}

/// Upper bound on `wait_ms` for change-feed long polls.
pub(super) const MAX_CHANGE_WAIT_MS: u64 = 30_000;

/// Events returned per change-feed poll.
pub(super) const CHANGE_BATCH_LIMIT: usize = 500;

#[derive(Debug, serde::Deserialize)]
pub(super) struct InsertQuery {
    #[serde(default)]
    pub(super) unique: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct ChangesQuery {
    #[serde(default)]
    pub(super) table: Option<String>,
    #[serde(default)]
    pub(super) since: u64,
    #[serde(default)]
    pub(super) wait_ms: u64,
}

pub(super) fn parse_table(name: &str) -> Result<Table, Response> {
    Table::parse(name).ok_or_else(|| not_found_msg(&format!("unknown table {}", name)))
}
