//! HTTP route registration for the carrinhos server.

use super::handlers_auth::verify_credentials;
use super::handlers_changes::{changes, head};
use super::handlers_rest::{delete_row, delete_rows_where, insert_row, select_rows, update_row};
use super::handlers_system::{healthz, require_bearer};
use super::*;

fn authed_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/rest/:table",
            get(select_rows).post(insert_row).delete(delete_rows_where),
        )
        .route("/rest/:table/:id", axum::routing::patch(update_row).delete(delete_row))
        .route("/changes/head", get(head))
        .route("/changes", get(changes))
        .route("/rpc/verify_credentials", post(verify_credentials))
        .layer(middleware::from_fn_with_state(state, require_bearer))
}

pub(super) fn build_app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(authed_router(state.clone()))
        .with_state(state)
}
