//! Error taxonomy shared by the store, the sync adapter and the command layer.

use thiserror::Error;

/// Failure talking to the backend collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unauthorized (api key invalid or missing)")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed backend payload: {0}")]
    Decode(String),

    /// A record that cannot be written as a row; nothing was sent.
    #[error("cannot encode row: {0}")]
    Encode(String),
}

impl RemoteError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Conflict(_))
    }
}

/// Input rejected before any remote call is attempted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("\"{0}\" já existe!")]
    Duplicate(String),

    #[error("quantity must be a positive number (got {0})")]
    InvalidQuantity(String),

    #[error("price must be zero or a positive number (got {0})")]
    InvalidPrice(String),

    #[error("unknown unit \"{0}\" (expected unidade, kg or litro)")]
    UnknownUnit(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} {id} is not loaded")]
    UnknownRecord { kind: &'static str, id: String },
}

impl Error {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Remote(e) if e.is_conflict())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

pub(crate) fn validate_quantity(q: f64) -> Result<f64, ValidationError> {
    if !q.is_finite() || q <= 0.0 {
        return Err(ValidationError::InvalidQuantity(q.to_string()));
    }
    Ok(q)
}

pub(crate) fn validate_price(p: f64) -> Result<f64, ValidationError> {
    if !p.is_finite() || p < 0.0 {
        return Err(ValidationError::InvalidPrice(p.to_string()));
    }
    Ok(p)
}
