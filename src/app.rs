//! Composition root: owns the store, the sync adapter and the change-feed
//! subscriber, and exposes the operations a presentation layer calls.
//!
//! Every remote-touching operation raises the `loading` flag while it runs
//! and records failures in the `error` flag. Local writes are optimistic:
//! they land in the store first and are not rolled back when the backend
//! rejects them.

use std::time::Duration;

use crate::error::{Error, RemoteError, Result};
use crate::model::{
    CatalogItem, DEFAULT_POLL_WAIT_MS, ListId, ListMembership, ShoppingList, UserId,
};
use crate::realtime::{SubscriptionState, Subscriber};
use crate::remote::{SharedBackend, SyncAdapter};
use crate::store::{EntityStore, SharedStore, Snapshot};

mod catalog;
mod commands;
mod entries;

#[derive(Clone, Debug)]
pub struct Options {
    /// Attached as owner on every created item and list.
    pub owner: Option<UserId>,
    /// Long-poll wait of change-feed channels.
    pub poll_wait: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            owner: None,
            poll_wait: Duration::from_millis(DEFAULT_POLL_WAIT_MS),
        }
    }
}

pub struct Carrinhos {
    adapter: SyncAdapter,
    store: SharedStore,
    subscriber: Subscriber,
    owner: Option<UserId>,
    /// Lowest head seen by the last full load; where the feed resumes.
    loaded_at: Option<u64>,
}

impl Carrinhos {
    pub fn new(backend: SharedBackend, options: Options) -> Self {
        let adapter = SyncAdapter::new(backend);
        let store = SharedStore::default();
        let subscriber =
            Subscriber::new(adapter.clone(), store.clone()).with_wait(options.poll_wait);
        Self {
            adapter,
            store,
            subscriber,
            owner: options.owner,
            loaded_at: None,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn adapter(&self) -> &SyncAdapter {
        &self.adapter
    }

    pub fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.store.lock().loading()
    }

    pub fn error(&self) -> Option<String> {
        self.store.lock().error().map(str::to_string)
    }

    pub fn clear_error(&self) {
        self.store.lock().clear_error();
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        self.store.lock().items().records().to_vec()
    }

    pub fn lists(&self) -> Vec<ShoppingList> {
        self.store.lock().lists().records().to_vec()
    }

    pub fn list_items_for(&self, list_id: &ListId) -> Vec<ListMembership> {
        self.store.lock().memberships_for(list_id)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn load_items(&self) -> Result<()> {
        let loaded = self.remote(|a| a.load_items())?;
        self.store.lock().replace_items(loaded);
        Ok(())
    }

    pub fn load_lists(&self) -> Result<()> {
        let loaded = self.remote(|a| a.load_lists())?;
        self.store.lock().replace_lists(loaded);
        Ok(())
    }

    pub fn load_memberships(&self) -> Result<()> {
        let loaded = self.remote(|a| a.load_memberships())?;
        self.store.lock().replace_memberships(loaded);
        Ok(())
    }

    /// Loads all three collections. A failure leaves the previous contents
    /// of the failing collection in place.
    pub fn load_all(&mut self) -> Result<()> {
        let items = self.remote(|a| a.load_items())?;
        let lists = self.remote(|a| a.load_lists())?;
        let memberships = self.remote(|a| a.load_memberships())?;
        self.loaded_at = Some(items.seq.min(lists.seq).min(memberships.seq));

        let mut store = self.store.lock();
        store.replace_items(items);
        store.replace_lists(lists);
        store.replace_memberships(memberships);
        tracing::info!(
            items = store.items().len(),
            lists = store.lists().len(),
            memberships = store.memberships().len(),
            "loaded collections"
        );
        Ok(())
    }

    /// Opens the change-feed. Calling it again replaces the open channels.
    pub fn subscribe_to_realtime(&mut self) -> Result<()> {
        let since = self.loaded_at;
        let out = self.subscriber.subscribe(since);
        if let Err(err) = &out {
            self.store.lock().set_error(err.to_string());
        }
        out.map_err(Error::Remote)
    }

    pub fn unsubscribe_from_realtime(&mut self) {
        self.subscriber.unsubscribe();
    }

    pub fn subscription_state(&self) -> SubscriptionState {
        self.subscriber.state()
    }

    pub fn realtime_channels(&self) -> usize {
        self.subscriber.channel_count()
    }

    /// Closes the change-feed; the instance stays usable for reads.
    pub fn dispose(&mut self) {
        self.subscriber.unsubscribe();
    }

    /// Runs one backend call with the status flags maintained.
    fn remote<T>(
        &self,
        call: impl FnOnce(&SyncAdapter) -> std::result::Result<T, RemoteError>,
    ) -> Result<T> {
        {
            let mut store = self.store.lock();
            store.begin_loading();
            store.clear_error();
        }
        let out = call(&self.adapter);
        let mut store = self.store.lock();
        store.end_loading();
        match out {
            Ok(v) => Ok(v),
            Err(err) => {
                tracing::warn!(%err, "backend call failed");
                store.set_error(err.to_string());
                Err(Error::Remote(err))
            }
        }
    }

    /// Optimistic write: `local` runs first (and must open the pending
    /// write), then the backend call, then `settle` with the acknowledgement
    /// or `None` on failure.
    fn optimistic<T>(
        &self,
        local: impl FnOnce(&mut EntityStore),
        call: impl FnOnce(&SyncAdapter) -> std::result::Result<T, RemoteError>,
        settle: impl FnOnce(&mut EntityStore, Option<&T>),
    ) -> Result<T> {
        local(&mut self.store.lock());
        let out = self.remote(call);
        settle(&mut self.store.lock(), out.as_ref().ok());
        out
    }
}

impl Drop for Carrinhos {
    fn drop(&mut self) {
        self.dispose();
    }
}
