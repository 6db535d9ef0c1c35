//! Transport layer abstraction.
//!
//! Defines the seam between [`CrossContextChannel`](crate::CrossContextChannel)
//! and whatever the host offers for inter-context messaging (an in-memory bus,
//! a relay socket, ...), so the channel logic never depends on the medium.

use crate::error::ChannelResult;
use formsync_types::UpdateAnnouncement;
use tokio::sync::broadcast;

/// Receiving end of a transport subscription.
///
/// Only announcements published after the subscription was created are
/// delivered.
pub type Subscription = broadcast::Receiver<UpdateAnnouncement>;

/// A named, unordered, non-persistent publish/subscribe medium.
pub trait AnnouncementTransport: Send + Sync {
    /// The channel name shared by every context on this medium.
    fn channel_name(&self) -> &str;

    /// Hands an announcement to the medium without waiting for delivery.
    fn publish(&self, announcement: UpdateAnnouncement) -> ChannelResult<()>;

    /// Starts receiving announcements.
    fn subscribe(&self) -> Subscription;
}

/// A recording transport for testing.
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Delivers locally like the memory hub and remembers every publish.
    #[derive(Debug, Clone)]
    pub struct RecordingTransport {
        name: String,
        sender: broadcast::Sender<UpdateAnnouncement>,
        published: Arc<Mutex<Vec<UpdateAnnouncement>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl RecordingTransport {
        /// Creates a new recording transport.
        pub fn new(name: impl Into<String>) -> Self {
            let (sender, _) = broadcast::channel(64);
            Self {
                name: name.into(),
                sender,
                published: Arc::new(Mutex::new(Vec::new())),
                fail: Arc::new(Mutex::new(false)),
            }
        }

        /// Every announcement published so far, in order.
        pub fn published(&self) -> Vec<UpdateAnnouncement> {
            self.published.lock().unwrap().clone()
        }

        /// Makes subsequent publishes fail with `ChannelClosed`.
        pub fn fail_publishes(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    impl AnnouncementTransport for RecordingTransport {
        fn channel_name(&self) -> &str {
            &self.name
        }

        fn publish(&self, announcement: UpdateAnnouncement) -> ChannelResult<()> {
            if *self.fail.lock().unwrap() {
                return Err(crate::error::ChannelError::ChannelClosed);
            }
            self.published.lock().unwrap().push(announcement);
            let _ = self.sender.send(announcement);
            Ok(())
        }

        fn subscribe(&self) -> Subscription {
            self.sender.subscribe()
        }
    }
}
