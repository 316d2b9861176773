use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use carrinhos::db::{Database, DbError};
use carrinhos::remote::{ErrorBody, Row, Table};

#[path = "carrinhos_server/types.rs"]
mod types;
use self::types::*;
#[path = "carrinhos_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "carrinhos_server/persistence.rs"]
mod persistence;
use self::persistence::*;
#[path = "carrinhos_server/handlers_system.rs"]
mod handlers_system;
#[path = "carrinhos_server/handlers_rest.rs"]
mod handlers_rest;
#[path = "carrinhos_server/handlers_changes.rs"]
mod handlers_changes;
#[path = "carrinhos_server/handlers_auth.rs"]
mod handlers_auth;
#[path = "carrinhos_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "carrinhos_server/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
