//! The handle views hold to announce and observe record updates.

use crate::error::{ChannelError, ChannelResult};
use crate::memory::MemoryTransport;
use crate::transport::{AnnouncementTransport, Subscription};
use formsync_types::{EntityId, UpdateAnnouncement};
use futures::Stream;
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Well-known name of the application-wide update channel.
pub const CHANNEL_NAME: &str = "formsync-entity-updates";

static SHARED: OnceLock<CrossContextChannel> = OnceLock::new();

/// A named broadcast channel connecting independent contexts.
///
/// Cloning is cheap; clones share the same transport.
#[derive(Clone)]
pub struct CrossContextChannel {
    transport: Arc<dyn AnnouncementTransport>,
}

impl CrossContextChannel {
    /// Creates a channel over the given transport.
    pub fn new(transport: impl AnnouncementTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Opens a context on the named in-memory channel of the global hub.
    pub fn in_memory(name: &str) -> Self {
        Self::new(MemoryTransport::open(name))
    }

    /// The process-wide channel, created on first use and never closed.
    ///
    /// Defaults to [`CHANNEL_NAME`] on the global in-memory hub unless
    /// [`CrossContextChannel::install_shared`] ran first.
    pub fn shared() -> &'static CrossContextChannel {
        SHARED.get_or_init(|| {
            debug!("Opening shared channel {}", CHANNEL_NAME);
            Self::in_memory(CHANNEL_NAME)
        })
    }

    /// Chooses the backend of the shared channel. Fails once the shared
    /// channel exists.
    pub fn install_shared(transport: impl AnnouncementTransport + 'static) -> ChannelResult<()> {
        SHARED
            .set(Self::new(transport))
            .map_err(|_| ChannelError::AlreadyInitialized)
    }

    /// The channel name.
    pub fn name(&self) -> &str {
        self.transport.channel_name()
    }

    /// Announces that `entity_id` was just updated.
    ///
    /// Returns as soon as the transport accepted the message.
    pub fn broadcast(&self, entity_id: EntityId) -> ChannelResult<UpdateAnnouncement> {
        let announcement = UpdateAnnouncement::now(entity_id);
        self.transport.publish(announcement)?;
        debug!("Broadcast {:?} on {}", announcement, self.name());
        Ok(announcement)
    }

    /// Every announcement published from now on, including this context's own.
    pub fn updates(&self) -> Updates {
        Updates {
            rx: self.transport.subscribe(),
            filter: None,
        }
    }

    /// Announcements about one entity only.
    pub fn updates_for(&self, entity_id: EntityId) -> Updates {
        Updates {
            rx: self.transport.subscribe(),
            filter: Some(entity_id),
        }
    }

    /// Runs `handler` for every announcement on a task of the current tokio
    /// runtime, so updates arrive through the same scheduler as the rest of
    /// the application's state changes.
    pub fn listen<F>(&self, mut handler: F) -> ChannelResult<ListenerHandle>
    where
        F: FnMut(UpdateAnnouncement) + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ChannelError::NoRuntime)?;
        let mut updates = self.updates();
        let task = runtime.spawn(async move {
            while let Some(announcement) = updates.recv().await {
                handler(announcement);
            }
        });
        Ok(ListenerHandle { task })
    }
}

impl std::fmt::Debug for CrossContextChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossContextChannel")
            .field("name", &self.name())
            .finish()
    }
}

/// A subscription to a channel's announcements.
#[derive(Debug)]
pub struct Updates {
    rx: Subscription,
    filter: Option<EntityId>,
}

impl Updates {
    fn accepts(&self, announcement: &UpdateAnnouncement) -> bool {
        self.filter.is_none_or(|id| announcement.is_for(id))
    }

    /// Waits for the next announcement. `None` once the channel is gone.
    ///
    /// A subscriber that fell behind skips what it missed and continues.
    pub async fn recv(&mut self) -> Option<UpdateAnnouncement> {
        loop {
            match self.rx.recv().await {
                Ok(announcement) if self.accepts(&announcement) => return Some(announcement),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Update subscriber lagged, skipped announcements");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already-delivered announcement without waiting.
    pub fn try_recv(&mut self) -> Option<UpdateAnnouncement> {
        loop {
            match self.rx.try_recv() {
                Ok(announcement) if self.accepts(&announcement) => return Some(announcement),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Update subscriber lagged, skipped announcements");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Adapts the subscription into a `Stream`.
    pub fn into_stream(self) -> impl Stream<Item = UpdateAnnouncement> + Send {
        futures::stream::unfold(self, |mut updates| async move {
            updates.recv().await.map(|ann| (ann, updates))
        })
    }
}

/// Keeps a [`CrossContextChannel::listen`] task alive; dropping it stops
/// the listener but leaves the channel open.
#[derive(Debug)]
pub struct ListenerHandle {
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Stops the listener.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the listener task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
