use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::RemoteError;
use crate::remote::{SyncAdapter, Table};
use crate::store::SharedStore;

use super::merge::apply_event;

/// Everything one channel thread needs; cloned per channel.
#[derive(Clone)]
pub(super) struct ChannelContext {
    pub(super) adapter: SyncAdapter,
    pub(super) store: SharedStore,
    pub(super) stop: Arc<AtomicBool>,
    pub(super) live: Arc<AtomicUsize>,
    pub(super) wait: Duration,
}

pub(super) fn spawn(
    table: Table,
    ctx: ChannelContext,
    cursor: u64,
) -> Result<JoinHandle<()>, RemoteError> {
    ctx.live.fetch_add(1, Ordering::SeqCst);
    let live = ctx.live.clone();
    std::thread::Builder::new()
        .name(format!("carrinhos-feed-{}", table))
        .spawn(move || run(table, ctx, cursor))
        .map_err(|e| {
            live.fetch_sub(1, Ordering::SeqCst);
            RemoteError::Transport(format!("spawn {} channel: {}", table, e))
        })
}

fn run(table: Table, ctx: ChannelContext, mut cursor: u64) {
    tracing::debug!(%table, cursor, "channel open");
    while !ctx.stop.load(Ordering::SeqCst) {
        let batch = match ctx.adapter.backend().changes(table, cursor, ctx.wait) {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(%table, %err, "channel dropped");
                ctx.store.lock().set_error(err.to_string());
                break;
            }
        };

        if batch.resync {
            match reload(table, &ctx) {
                Ok(seq) => {
                    tracing::info!(%table, seq, "channel resynced");
                    cursor = seq;
                }
                Err(err) => {
                    tracing::warn!(%table, %err, "channel resync failed");
                    ctx.store.lock().set_error(err.to_string());
                    break;
                }
            }
            continue;
        }

        if !batch.events.is_empty() {
            let mut store = ctx.store.lock();
            for event in &batch.events {
                apply_event(&mut store, event);
            }
        }
        cursor = batch.cursor.max(cursor);
    }
    ctx.live.fetch_sub(1, Ordering::SeqCst);
    tracing::debug!(%table, cursor, "channel closed");
}

/// Reloads the channel's collection; returns the head to continue from.
fn reload(table: Table, ctx: &ChannelContext) -> Result<u64, RemoteError> {
    let adapter = &ctx.adapter;
    match table {
        Table::Item => {
            let loaded = adapter.load_items()?;
            let seq = loaded.seq;
            ctx.store.lock().replace_items(loaded);
            Ok(seq)
        }
        Table::ShoppingList => {
            let loaded = adapter.load_lists()?;
            let seq = loaded.seq;
            ctx.store.lock().replace_lists(loaded);
            Ok(seq)
        }
        Table::ListItem => {
            let loaded = adapter.load_memberships()?;
            let seq = loaded.seq;
            ctx.store.lock().replace_memberships(loaded);
            Ok(seq)
        }
    }
}
