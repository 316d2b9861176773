use carrinhos::db::DbSnapshot;
use carrinhos::session::write_atomic;

use super::*;

pub(super) fn db_state_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("db.json")
}

/// Opens the database persisted under `data_dir`, or an empty one.
pub(super) fn load_db_from_disk(data_dir: &std::path::Path, log_capacity: usize) -> Result<Database> {
    let path = db_state_path(data_dir);
    if !path.exists() {
        return Ok(Database::new(log_capacity));
    }
    let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let snapshot: DbSnapshot =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    let db = Database::from_snapshot(snapshot, log_capacity)
        .with_context(|| format!("restore {}", path.display()))?;
    tracing::info!(path = %path.display(), seq = db.head(), "restored database");
    Ok(db)
}

pub(super) fn persist_db(state: &AppState) -> Result<()> {
    let _guard = state
        .persist_lock
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let snapshot = state.db.snapshot();
    let bytes = serde_json::to_vec_pretty(&snapshot).context("serialize db snapshot")?;
    write_atomic(&db_state_path(&state.data_dir), &bytes).context("write db.json")?;
    Ok(())
}

/// Writes the snapshot after a mutation. The write already happened in
/// memory, so a failure is logged rather than reported to the caller.
pub(super) fn persist_after_write(state: &AppState) {
    if let Err(err) = persist_db(state) {
        tracing::error!(err = %format!("{:#}", err), "failed to persist database");
    }
}
