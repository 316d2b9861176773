//! Client state directory (`.carrinhos/`): backend configuration and the
//! signed-in session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{ClientConfig, ClientSession, Identity, UserId, now_ts};

const CLIENT_DIR: &str = ".carrinhos";

#[derive(Clone, Debug)]
pub struct ClientDir {
    root: PathBuf,
}

impl ClientDir {
    pub fn dir_for(root: &Path) -> PathBuf {
        root.join(CLIENT_DIR)
    }

    pub fn open(root: &Path) -> Result<Self> {
        let dir = Self::dir_for(root);
        if !dir.is_dir() {
            return Err(anyhow!(
                "No {} directory found at {} (run `carrinhos init`)",
                CLIENT_DIR,
                dir.display()
            ));
        }
        Ok(Self { root: dir })
    }

    pub fn init(root: &Path, force: bool) -> Result<Self> {
        let dir = Self::dir_for(root);
        if dir.exists() && !force {
            return Err(anyhow!(
                "{} already exists at {} (use --force to re-init)",
                CLIENT_DIR,
                dir.display()
            ));
        }
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

        let out = Self { root: dir };
        out.write_config(&ClientConfig::default())?;
        out.write_session(&ClientSession {
            version: 1,
            ..ClientSession::default()
        })?;
        Ok(out)
    }

    /// Finds the nearest `.carrinhos` directory at or above `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start
            .canonicalize()
            .with_context(|| format!("canonicalize {}", start.display()))?;
        for dir in start.ancestors() {
            if Self::dir_for(dir).is_dir() {
                return Self::open(dir);
            }
        }
        Err(anyhow!(
            "No {} directory found (run `carrinhos init`)",
            CLIENT_DIR
        ))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn read_config(&self) -> Result<ClientConfig> {
        let bytes = fs::read(self.root.join("config.json")).context("read config.json")?;
        let cfg: ClientConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported client config version {}", cfg.version);
        }
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ClientConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        Ok(())
    }

    pub fn read_session(&self) -> Result<ClientSession> {
        let path = self.root.join("session.json");
        if !path.exists() {
            return Ok(ClientSession {
                version: 1,
                ..ClientSession::default()
            });
        }
        let bytes = fs::read(&path).context("read session.json")?;
        let session: ClientSession =
            serde_json::from_slice(&bytes).context("parse session.json")?;
        if session.version != 1 {
            anyhow::bail!("unsupported session version {}", session.version);
        }
        Ok(session)
    }

    pub fn write_session(&self, session: &ClientSession) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(session).context("serialize session")?;
        write_atomic(&self.root.join("session.json"), &bytes).context("write session.json")?;
        Ok(())
    }

    pub fn sign_in(&self, identity: Identity) -> Result<ClientSession> {
        let session = ClientSession {
            version: 1,
            identity: Some(identity),
            signed_in_at: Some(now_ts().context("format sign-in time")?),
        };
        self.write_session(&session)?;
        Ok(session)
    }

    pub fn sign_out(&self) -> Result<()> {
        self.write_session(&ClientSession {
            version: 1,
            ..ClientSession::default()
        })
    }

    /// Owner reference attached to newly created rows.
    pub fn owner(&self) -> Result<Option<UserId>> {
        Ok(self.read_session()?.identity.map(|i| i.id))
    }
}

/// Writes through a temp file and a rename so readers never see a torn file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
