//! Extension points of the autosave pipeline.
//!
//! Forms customize autosave by composing hooks rather than subclassing:
//! [`AnnounceOnSave`] and [`CacheOnSave`] wrap any other hook.

use crate::normalizer::normalize_enum_selections;
use async_trait::async_trait;
use formsync_channel::CrossContextChannel;
use formsync_types::{EntityId, FormSnapshot};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Customization surface of a controller.
#[async_trait]
pub trait SaveHooks<T: Send + Sync + 'static>: Send + Sync + 'static {
    /// Turns the raw form snapshot into the values sent to the save
    /// operation. Defaults to converting multi-select options into keys.
    fn preprocess_snapshot(&self, snapshot: FormSnapshot) -> FormSnapshot {
        normalize_enum_selections(snapshot)
    }

    /// Runs after a save that is still current succeeded.
    async fn on_successful_save(&self, _entity_id: EntityId, _saved: &T) {}
}

/// Normalizes snapshots and does nothing on success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl<T: Send + Sync + 'static> SaveHooks<T> for DefaultHooks {}

/// Broadcasts an update announcement after every successful save so other
/// contexts editing the same record know their copy is stale.
#[derive(Debug, Clone)]
pub struct AnnounceOnSave<H> {
    inner: H,
    channel: CrossContextChannel,
}

impl<H> AnnounceOnSave<H> {
    /// Announces on `channel` after `inner` ran.
    pub fn new(inner: H, channel: CrossContextChannel) -> Self {
        Self { inner, channel }
    }

    /// Announces on the process-wide shared channel.
    pub fn shared(inner: H) -> Self {
        Self::new(inner, CrossContextChannel::shared().clone())
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn channel(&self) -> &CrossContextChannel {
        &self.channel
    }
}

#[async_trait]
impl<T, H> SaveHooks<T> for AnnounceOnSave<H>
where
    T: Send + Sync + 'static,
    H: SaveHooks<T>,
{
    fn preprocess_snapshot(&self, snapshot: FormSnapshot) -> FormSnapshot {
        self.inner.preprocess_snapshot(snapshot)
    }

    async fn on_successful_save(&self, entity_id: EntityId, saved: &T) {
        self.inner.on_successful_save(entity_id, saved).await;
        // A lost announcement only means other views refresh later.
        if let Err(e) = self.channel.broadcast(entity_id) {
            warn!("Failed to announce update of entity {}: {}", entity_id, e);
        }
    }
}

/// Keeps the most recently saved copy of the record.
#[derive(Debug)]
pub struct CacheOnSave<T, H = DefaultHooks> {
    inner: H,
    latest: watch::Sender<Option<T>>,
}

impl<T: Clone> CacheOnSave<T, DefaultHooks> {
    /// Caches `initial` (the record as loaded) until the first save.
    pub fn new(initial: Option<T>) -> Self {
        Self::wrapping(DefaultHooks, initial)
    }
}

impl<T: Clone, H> CacheOnSave<T, H> {
    /// Caches saved records after `inner` ran.
    pub fn wrapping(inner: H, initial: Option<T>) -> Self {
        Self {
            inner,
            latest: watch::Sender::new(initial),
        }
    }

    /// The cached record.
    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    /// Observes cache replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.latest.subscribe()
    }
}

#[async_trait]
impl<T, H> SaveHooks<T> for CacheOnSave<T, H>
where
    T: Clone + Send + Sync + 'static,
    H: SaveHooks<T>,
{
    fn preprocess_snapshot(&self, snapshot: FormSnapshot) -> FormSnapshot {
        self.inner.preprocess_snapshot(snapshot)
    }

    async fn on_successful_save(&self, entity_id: EntityId, saved: &T) {
        debug!("Caching saved copy of entity {}", entity_id);
        self.latest.send_replace(Some(saved.clone()));
        self.inner.on_successful_save(entity_id, saved).await;
    }
}
