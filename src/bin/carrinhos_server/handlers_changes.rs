use std::time::Duration;

use carrinhos::remote::HeadResponse;

use super::*;

pub(super) async fn head(State(state): State<Arc<AppState>>) -> Json<HeadResponse> {
    Json(HeadResponse {
        seq: state.db.head(),
    })
}

/// Long poll: blocks up to `wait_ms` for changes after `since`.
pub(super) async fn changes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ChangesQuery>,
) -> Response {
    let table = match q.table.as_deref().map(parse_table).transpose() {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let wait = Duration::from_millis(q.wait_ms.min(MAX_CHANGE_WAIT_MS));
    let db = state.db.clone();
    let since = q.since;

    let out = tokio::task::spawn_blocking(move || {
        db.wait_changes(table, since, CHANGE_BATCH_LIMIT, wait)
    })
    .await;
    match out {
        Ok(batch) => Json(batch).into_response(),
        Err(err) => internal_error(anyhow::Error::new(err).context("wait for changes")),
    }
}
