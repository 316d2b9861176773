use serde::{Deserialize, Serialize};

use super::DbError;
use crate::model::{Identity, UserId, new_uuid};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,

    salt: String,

    // Stored hash of salt + password.
    password_hash: String,
}

impl UserRecord {
    pub(super) fn new(email: &str, password: &str, name: &str) -> Result<Self, DbError> {
        let email = email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(DbError::Invalid(format!("invalid email {:?}", email)));
        }
        if password.is_empty() {
            return Err(DbError::Invalid("password cannot be empty".to_string()));
        }
        let name = match name.trim() {
            "" => email.split('@').next().unwrap_or_default().to_string(),
            n => n.to_string(),
        };
        let salt = generate_salt()?;
        Ok(Self {
            id: new_uuid(),
            password_hash: hash_password(&salt, password),
            salt,
            email,
            name,
        })
    }

    pub(super) fn verify(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.password_hash
    }

    pub(super) fn identity(&self) -> Identity {
        Identity {
            id: UserId(self.id.clone()),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// 16 bytes of entropy, hex-encoded.
fn generate_salt() -> Result<String, DbError> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| DbError::Entropy(e.to_string()))?;
    let mut out = String::with_capacity(32);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"\n");
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}
