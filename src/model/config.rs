use serde::{Deserialize, Serialize};

use super::ids::UserId;

pub const DEFAULT_POLL_WAIT_MS: u64 = 2_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    /// Long-poll wait used by change-feed channels.
    #[serde(default = "default_poll_wait_ms")]
    pub poll_wait_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            remote: None,
            poll_wait_ms: DEFAULT_POLL_WAIT_MS,
        }
    }
}

fn default_poll_wait_ms() -> u64 {
    DEFAULT_POLL_WAIT_MS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Identity returned by the credential check and persisted between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClientSession {
    pub version: u32,

    #[serde(default)]
    pub identity: Option<Identity>,

    #[serde(default)]
    pub signed_in_at: Option<String>,
}
