use carrinhos::model::Identity;
use carrinhos::remote::CredentialsRequest;

use super::*;

/// Answers `null` for an unknown email or a wrong password.
pub(super) async fn verify_credentials(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Json<Option<Identity>> {
    let identity = state.db.verify_credentials(&req.email, &req.password);
    if identity.is_none() {
        tracing::info!(email = %req.email, "credential check failed");
    }
    Json(identity)
}
