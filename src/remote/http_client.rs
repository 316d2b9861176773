use super::*;

impl RemoteClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = error_message(resp).unwrap_or_else(|| format!("{} failed", label));
        tracing::debug!(%status, label, %message, "backend rejected request");
        Err(match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                RemoteError::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => RemoteError::NotFound(message),
            reqwest::StatusCode::CONFLICT => RemoteError::Conflict(message),
            _ => RemoteError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }

    pub(super) fn auth(&self) -> String {
        format!("Bearer {}", self.remote.api_key)
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.remote.base_url.trim_end_matches('/'), path)
    }

    pub(super) fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
        label: &str,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let resp = req
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .map_err(|e| RemoteError::Transport(format!("{}: {}", label, e)))?;
        self.ensure_ok(resp, label)
    }

    pub(super) fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::blocking::RequestBuilder,
        label: &str,
    ) -> Result<T, RemoteError> {
        self.send(req, label)?
            .json()
            .map_err(|e| RemoteError::Decode(format!("parse {}: {}", label, e)))
    }
}

fn error_message(resp: reqwest::blocking::Response) -> Option<String> {
    let body: ErrorBody = resp.json().ok()?;
    Some(body.error)
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
