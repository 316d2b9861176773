use super::*;

fn error_body(status: StatusCode, msg: impl Into<String>) -> Response {
    let msg: String = msg.into();
    (status, Json(ErrorBody { error: msg })).into_response()
}

pub(super) fn unauthorized() -> Response {
    error_body(StatusCode::UNAUTHORIZED, "unauthorized")
}

pub(super) fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(err = %format!("{:#}", err), "request failed");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
}

pub(super) fn bad_request(msg: &str) -> Response {
    error_body(StatusCode::BAD_REQUEST, msg)
}

pub(super) fn not_found_msg(msg: &str) -> Response {
    error_body(StatusCode::NOT_FOUND, msg)
}

/// Maps engine errors onto status codes the client turns back into
/// `RemoteError` kinds.
pub(super) fn db_error(err: DbError) -> Response {
    let status = match &err {
        DbError::NotFound { .. } => StatusCode::NOT_FOUND,
        DbError::Conflict(_) => StatusCode::CONFLICT,
        DbError::Invalid(_) => StatusCode::BAD_REQUEST,
        DbError::Entropy(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::debug!(%status, %err, "rejecting request");
    error_body(status, err.to_string())
}
