//! Change-feed subscriber: one long-polling channel per table, each merging
//! what it receives into the shared store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::RemoteError;
use crate::model::DEFAULT_POLL_WAIT_MS;
use crate::remote::{SyncAdapter, Table};
use crate::store::SharedStore;

mod channel;
pub mod merge;

use self::channel::ChannelContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionState {
    Unsubscribed,
    Subscribing,
    Active,
}

pub struct Subscriber {
    adapter: SyncAdapter,
    store: SharedStore,
    wait: Duration,
    subscribing: bool,
    stop: Arc<AtomicBool>,
    live: Arc<AtomicUsize>,
    channels: Vec<(Table, JoinHandle<()>)>,
}

impl Subscriber {
    pub fn new(adapter: SyncAdapter, store: SharedStore) -> Self {
        Self {
            adapter,
            store,
            wait: Duration::from_millis(DEFAULT_POLL_WAIT_MS),
            subscribing: false,
            stop: Arc::new(AtomicBool::new(false)),
            live: Arc::new(AtomicUsize::new(0)),
            channels: Vec::new(),
        }
    }

    /// Long-poll wait per request; also bounds how long `unsubscribe` blocks.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    pub fn state(&self) -> SubscriptionState {
        if self.subscribing {
            SubscriptionState::Subscribing
        } else if self.channels.is_empty() || self.live.load(Ordering::SeqCst) == 0 {
            SubscriptionState::Unsubscribed
        } else {
            SubscriptionState::Active
        }
    }

    /// Number of channels still polling.
    pub fn channel_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Opens the three channels, tearing down any existing ones first.
    /// Channels start at `since`, or at the backend head when `None`.
    pub fn subscribe(&mut self, since: Option<u64>) -> Result<(), RemoteError> {
        self.unsubscribe();
        self.subscribing = true;
        let out = self.open(since);
        self.subscribing = false;
        if out.is_err() {
            self.unsubscribe();
        }
        out
    }

    fn open(&mut self, since: Option<u64>) -> Result<(), RemoteError> {
        let cursor = match since {
            Some(seq) => seq,
            None => self.adapter.backend().head()?,
        };
        self.stop = Arc::new(AtomicBool::new(false));
        self.live = Arc::new(AtomicUsize::new(0));
        let ctx = ChannelContext {
            adapter: self.adapter.clone(),
            store: self.store.clone(),
            stop: self.stop.clone(),
            live: self.live.clone(),
            wait: self.wait,
        };
        for table in Table::ALL {
            let handle = channel::spawn(table, ctx.clone(), cursor)?;
            self.channels.push((table, handle));
        }
        tracing::info!(cursor, channels = self.channels.len(), "subscribed to change-feed");
        Ok(())
    }

    /// Stops and joins every channel. Safe to call when not subscribed.
    pub fn unsubscribe(&mut self) {
        if self.channels.is_empty() {
            return;
        }
        self.stop.store(true, Ordering::SeqCst);
        for (table, handle) in self.channels.drain(..) {
            if handle.join().is_err() {
                tracing::warn!(%table, "channel thread panicked");
            }
        }
        tracing::info!("unsubscribed from change-feed");
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
