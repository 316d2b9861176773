use std::collections::HashMap;

use carrinhos::remote::{DeletedRows, SelectResponse};

use super::*;

pub(super) async fn select_rows(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
) -> Response {
    let table = match parse_table(&table) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let (rows, seq) = state.db.select(table);
    Json(SelectResponse { rows, seq }).into_response()
}

pub(super) async fn insert_row(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Query(q): Query<InsertQuery>,
    Json(row): Json<Row>,
) -> Response {
    let table = match parse_table(&table) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let unique: Vec<&str> = q
        .unique
        .as_deref()
        .map(|u| u.split(',').map(str::trim).filter(|c| !c.is_empty()).collect())
        .unwrap_or_default();

    let out = if unique.is_empty() {
        state.db.insert(table, row)
    } else {
        state.db.insert_if_absent(table, row, &unique)
    };
    match out {
        Ok(stored) => {
            tracing::debug!(%table, seq = stored.seq, "insert");
            persist_after_write(&state);
            Json(stored).into_response()
        }
        Err(err) => db_error(err),
    }
}

pub(super) async fn update_row(
    State(state): State<Arc<AppState>>,
    Path((table, id)): Path<(String, String)>,
    Json(patch): Json<Row>,
) -> Response {
    let table = match parse_table(&table) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    match state.db.update(table, &id, patch) {
        Ok(stored) => {
            tracing::debug!(%table, id = %id, seq = stored.seq, "update");
            persist_after_write(&state);
            Json(stored).into_response()
        }
        Err(err) => db_error(err),
    }
}

pub(super) async fn delete_row(
    State(state): State<Arc<AppState>>,
    Path((table, id)): Path<(String, String)>,
) -> Response {
    let table = match parse_table(&table) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    match state.db.delete(table, &id) {
        Ok(gone) => {
            tracing::debug!(%table, id = %id, seq = gone.seq, "delete");
            persist_after_write(&state);
            Json(gone).into_response()
        }
        Err(err) => db_error(err),
    }
}

/// `DELETE /rest/{table}?{column}={value}`: exactly one filter is required.
pub(super) async fn delete_rows_where(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Query(filter): Query<HashMap<String, String>>,
) -> Response {
    let table = match parse_table(&table) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let mut pairs = filter.iter();
    let (Some((column, value)), None) = (pairs.next(), pairs.next()) else {
        return bad_request("bulk delete needs exactly one column=value filter");
    };
    match state.db.delete_where(table, column, value) {
        Ok(rows) => {
            tracing::debug!(%table, column = %column, removed = rows.len(), "delete where");
            if !rows.is_empty() {
                persist_after_write(&state);
            }
            Json(DeletedRows { rows }).into_response()
        }
        Err(err) => db_error(err),
    }
}
