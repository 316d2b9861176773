use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use carrinhos::db::Database;
use carrinhos::remote::LocalBackend;
use carrinhos::{Carrinhos, Options};

pub const API_KEY: &str = "test-key";
pub const USER_EMAIL: &str = "ana@example.com";
pub const USER_PASSWORD: &str = "s3nha";

pub struct ServerGuard {
    pub base_url: String,
    pub api_key: String,
    pub data_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[allow(dead_code)]
pub fn spawn_server() -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    spawn_server_in(data_dir)
}

/// Starts a server on `data_dir`, seeding the test user.
#[allow(dead_code)]
pub fn spawn_server_in(data_dir: tempfile::TempDir) -> Result<ServerGuard> {
    let addr_file = data_dir.path().join("addr.txt");
    let _ = std::fs::remove_file(&addr_file);
    let user = format!("{}:{}:Ana", USER_EMAIL, USER_PASSWORD);

    let child = Command::new(env!("CARGO_BIN_EXE_carrinhos-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().context("addr file path")?,
            "--data-dir",
            data_dir.path().to_str().context("data dir path")?,
            "--api-key",
            API_KEY,
            "--user",
            &user,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn carrinhos-server")?;

    let mut guard = ServerGuard {
        base_url: String::new(),
        api_key: API_KEY.to_string(),
        data_dir,
        child,
    };
    guard.base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&guard.base_url)?;
    Ok(guard)
}

impl ServerGuard {
    /// Stops the server and hands back its data directory.
    #[allow(dead_code)]
    pub fn stop(mut self) -> tempfile::TempDir {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let placeholder = tempfile::tempdir().expect("placeholder tempdir");
        std::mem::replace(&mut self.data_dir, placeholder)
    }
}

fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

#[allow(dead_code)]
pub fn auth_header(key: &str) -> String {
    format!("Bearer {}", key)
}

/// A client on an in-process backend sharing `db`.
#[allow(dead_code)]
pub fn local_client(db: &Arc<Database>) -> Carrinhos {
    let backend = LocalBackend::new(db.clone());
    Carrinhos::new(
        Arc::new(backend),
        Options {
            owner: None,
            poll_wait: Duration::from_millis(100),
        },
    )
}

/// Polls `cond` until it holds or `timeout` passes.
#[allow(dead_code)]
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    cond()
}
