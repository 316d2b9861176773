use super::*;

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn bearer_key(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Every route except `/healthz` needs the server's API key.
pub(super) async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    match bearer_key(req.headers()) {
        Some(key) if hash_api_key(key) == state.api_key_hash => next.run(req).await,
        _ => unauthorized(),
    }
}
