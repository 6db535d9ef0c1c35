//! Channel membership and fan-out.

use formsync_channel::memory::CHANNEL_CAPACITY;
use formsync_types::UpdateAnnouncement;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Identifies one connection for the lifetime of the hub.
pub type PeerId = u64;

/// Announcements queued per connection before new ones are dropped.
pub const PEER_QUEUE_CAPACITY: usize = CHANNEL_CAPACITY;

/// Outbound queue of one connection.
pub type PeerReceiver = mpsc::Receiver<UpdateAnnouncement>;

#[derive(Debug, Default)]
struct ChannelEntry {
    peers: HashMap<PeerId, mpsc::Sender<UpdateAnnouncement>>,
    relayed: u64,
}

/// Per-channel numbers exposed over HTTP.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChannelStats {
    pub name: String,
    pub subscribers: usize,
    pub relayed: u64,
}

/// Connected peers grouped by channel name.
///
/// An announcement from one peer goes to every other peer on the same
/// channel, never back to the sender and never across channels. A channel
/// exists while it has peers; its counters go with it.
#[derive(Debug, Default)]
pub struct Hub {
    channels: Mutex<BTreeMap<String, ChannelEntry>>,
    next_peer: AtomicU64,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    fn channels(&self) -> MutexGuard<'_, BTreeMap<String, ChannelEntry>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a peer to `channel` and returns its id and outbound queue.
    pub fn join(&self, channel: &str) -> (PeerId, PeerReceiver) {
        let peer = self.next_peer.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = mpsc::channel(PEER_QUEUE_CAPACITY);
        self.channels()
            .entry(channel.to_string())
            .or_default()
            .peers
            .insert(peer, tx);
        debug!("Peer {} joined channel {}", peer, channel);
        (peer, rx)
    }

    /// Removes a peer, and the channel once its last peer left.
    pub fn leave(&self, channel: &str, peer: PeerId) {
        let mut channels = self.channels();
        if let Some(entry) = channels.get_mut(channel) {
            entry.peers.remove(&peer);
            debug!("Peer {} left channel {}", peer, channel);
            if entry.peers.is_empty() {
                channels.remove(channel);
                debug!("Closed empty channel {}", channel);
            }
        }
    }

    /// Forwards `announcement` to every other peer on `channel`. Returns how
    /// many peers it was queued for. A peer whose queue is full misses the
    /// announcement.
    pub fn relay(&self, channel: &str, from: PeerId, announcement: UpdateAnnouncement) -> usize {
        let mut channels = self.channels();
        let Some(entry) = channels.get_mut(channel) else {
            return 0;
        };
        entry.relayed += 1;

        let mut delivered = 0;
        entry.peers.retain(|&peer, tx| {
            if peer == from {
                return true;
            }
            match tx.try_send(announcement) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    warn!("Peer {} on {} is not reading, dropped announcement", peer, channel);
                    true
                }
                // The connection is shutting down.
                Err(TrySendError::Closed(_)) => false,
            }
        });
        debug!(
            "Relayed update of entity {} on {} to {} peer(s)",
            announcement.id, channel, delivered
        );
        delivered
    }

    /// Number of peers currently on `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels().get(channel).map_or(0, |e| e.peers.len())
    }

    /// Stats for every open channel, sorted by name.
    pub fn stats(&self) -> Vec<ChannelStats> {
        self.channels()
            .iter()
            .map(|(name, entry)| ChannelStats {
                name: name.clone(),
                subscribers: entry.peers.len(),
                relayed: entry.relayed,
            })
            .collect()
    }
}
