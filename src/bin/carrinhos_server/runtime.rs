use std::sync::Mutex;

use clap::Parser;

use super::*;

#[derive(Parser)]
#[command(name = "carrinhos-server")]
#[command(about = "Carrinhos backend: tables, change-feed and credential check", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory (db.json lives here)
    #[arg(long, default_value = "./carrinhos-data")]
    data_dir: PathBuf,

    /// Bearer API key clients must present
    #[arg(long, default_value = "dev")]
    api_key: String,

    /// Seed a user: email:password[:name] (repeatable)
    #[arg(long = "user", value_name = "EMAIL:PASSWORD[:NAME]")]
    users: Vec<String>,

    /// Change-feed events retained for polling clients
    #[arg(long, default_value_t = carrinhos::db::DEFAULT_LOG_CAPACITY)]
    change_log_capacity: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let db = load_db_from_disk(&args.data_dir, args.change_log_capacity)
        .context("load database")?;
    let state = Arc::new(AppState {
        db: Arc::new(db),
        data_dir: args.data_dir.clone(),
        api_key_hash: hash_api_key(&args.api_key),
        persist_lock: Arc::new(Mutex::new(())),
    });
    seed_users(&state, &args.users)?;
    persist_db(&state).context("persist database")?;

    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(%local_addr, "carrinhos-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level
            .parse::<tracing::Level>()
            .with_context(|| format!("parse --log-level {:?}", args.log_level))?
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install tracing subscriber")
}

/// Adds `--user` accounts; users restored from disk are left alone.
fn seed_users(state: &AppState, entries: &[String]) -> Result<()> {
    for entry in entries {
        let mut parts = entry.splitn(3, ':');
        let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
            anyhow::bail!("invalid --user {:?} (expected email:password[:name])", entry);
        };
        let name = parts.next().unwrap_or_default();
        match state.db.add_user(email, password, name) {
            Ok(identity) => tracing::info!(email = %identity.email, "seeded user"),
            Err(DbError::Conflict(_)) => {
                tracing::debug!(email, "user already present");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("seed user {}", email));
            }
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
