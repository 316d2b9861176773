use std::path::PathBuf;

use carrinhos::model::RemoteConfig;
use carrinhos::remote::{Backend, RemoteClient};

use super::*;

pub(super) fn handle_init_command(force: bool, path: Option<PathBuf>) -> Result<()> {
    let root = path.unwrap_or(std::env::current_dir().context("get current dir")?);
    ClientDir::init(&root, force)?;
    println!("Initialized carrinhos at {}", root.display());
    Ok(())
}

pub(super) fn handle_remote_command(dir: &ClientDir, command: RemoteCommands) -> Result<()> {
    match command {
        RemoteCommands::Show { json } => {
            let cfg = dir.read_config()?;
            if json {
                print_json(&cfg.remote, "remote json")?;
            } else if let Some(remote) = cfg.remote {
                println!("url: {}", remote.base_url);
                println!("poll_wait_ms: {}", cfg.poll_wait_ms);
            } else {
                println!("No remote configured");
            }
        }
        RemoteCommands::Set { url, api_key } => {
            let mut cfg = dir.read_config()?;
            cfg.remote = Some(RemoteConfig {
                base_url: url,
                api_key,
            });
            dir.write_config(&cfg)?;
            println!("Remote configured");
        }
    }
    Ok(())
}

pub(super) fn handle_login_command(dir: &ClientDir, email: &str, password: &str) -> Result<()> {
    let remote = require_remote(dir)?;
    let client = RemoteClient::new(remote).context("create remote client")?;
    let identity = client
        .verify_credentials(email, password)
        .context("verify credentials")?
        .context("invalid email or password")?;
    let session = dir.sign_in(identity)?;
    if let Some(identity) = session.identity {
        println!("Logged in as {} <{}>", identity.name, identity.email);
    }
    Ok(())
}

pub(super) fn handle_logout_command(dir: &ClientDir) -> Result<()> {
    dir.sign_out()?;
    println!("Logged out");
    Ok(())
}

pub(super) fn handle_whoami_command(dir: &ClientDir, json: bool) -> Result<()> {
    let session = dir.read_session()?;
    if json {
        return print_json(&session, "session json");
    }
    match session.identity {
        Some(identity) => {
            println!("user: {} <{}>", identity.name, identity.email);
            println!("id: {}", identity.id);
            if let Some(at) = session.signed_in_at {
                println!("signed_in_at: {}", at);
            }
        }
        None => println!("Not logged in"),
    }
    Ok(())
}
