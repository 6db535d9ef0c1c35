//! In-memory transport shared by every context of one process.

use crate::error::ChannelResult;
use crate::transport::{AnnouncementTransport, Subscription};
use formsync_types::UpdateAnnouncement;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Announcements buffered per subscriber before it starts lagging.
pub const CHANNEL_CAPACITY: usize = 256;

static GLOBAL_HUB: OnceLock<MemoryHub> = OnceLock::new();

/// Registry of named in-memory channels.
///
/// Channels are created on first open and live as long as the hub; opening
/// the same name twice yields two contexts on the same medium.
#[derive(Debug, Default)]
pub struct MemoryHub {
    channels: Mutex<HashMap<String, broadcast::Sender<UpdateAnnouncement>>>,
}

impl MemoryHub {
    /// Creates an isolated hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide hub, created lazily.
    pub fn global() -> &'static MemoryHub {
        GLOBAL_HUB.get_or_init(MemoryHub::new)
    }

    /// Opens a context on the named channel.
    pub fn open(&self, name: &str) -> MemoryTransport {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = channels
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Creating in-memory channel {}", name);
                broadcast::channel(CHANNEL_CAPACITY).0
            })
            .clone();
        MemoryTransport {
            name: name.to_string(),
            sender,
        }
    }

    /// Names of every channel opened so far.
    pub fn channel_names(&self) -> Vec<String> {
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.keys().cloned().collect()
    }

    /// Number of live subscriptions on a channel.
    pub fn subscriber_count(&self, name: &str) -> usize {
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.get(name).map_or(0, |s| s.receiver_count())
    }
}

/// One context's handle on an in-memory channel.
///
/// A context receives its own announcements too.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    name: String,
    sender: broadcast::Sender<UpdateAnnouncement>,
}

impl MemoryTransport {
    /// Opens the named channel on the global hub.
    pub fn open(name: &str) -> Self {
        MemoryHub::global().open(name)
    }
}

impl AnnouncementTransport for MemoryTransport {
    fn channel_name(&self) -> &str {
        &self.name
    }

    fn publish(&self, announcement: UpdateAnnouncement) -> ChannelResult<()> {
        // No receivers is not an error: nobody is listening yet.
        match self.sender.send(announcement) {
            Ok(n) => trace!("Delivered {:?} to {} subscriber(s) on {}", announcement, n, self.name),
            Err(_) => trace!("No subscribers on {} for {:?}", self.name, announcement),
        }
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.sender.subscribe()
    }
}
