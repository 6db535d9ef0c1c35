//! Cross-context update announcements for formsync.
//!
//! Every view editing a record can tell every other view "entity X was
//! updated at T" so they can decide whether to refetch before overwriting
//! the record with stale data.
//!
//! # Architecture
//!
//! - **Transport**: the [`AnnouncementTransport`] seam (`publish` / `subscribe`)
//! - **Memory**: a process-wide hub of named in-memory channels
//! - **Socket**: a TCP client for `formsync-relay`, linking separate processes
//! - **Codec**: length-prefixed JSON frames used on the socket
//! - **Channel**: [`CrossContextChannel`], the handle views actually hold
//!
//! Delivery is fire-and-forget and never replayed: a context that subscribes
//! after a broadcast was sent will not see it.
//!
//! # Example
//!
//! ```
//! use formsync_channel::CrossContextChannel;
//! use formsync_types::EntityId;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let tab_a = CrossContextChannel::in_memory("doc-example");
//! let tab_b = CrossContextChannel::in_memory("doc-example");
//! let mut updates = tab_b.updates();
//!
//! tab_a.broadcast(EntityId::new(42)).unwrap();
//! let ann = updates.recv().await.unwrap();
//! assert_eq!(ann.id, EntityId::new(42));
//! # }
//! ```

mod channel;
pub mod codec;
mod error;
pub mod memory;
pub mod socket;
pub mod transport;

pub use channel::{CrossContextChannel, ListenerHandle, Updates, CHANNEL_NAME};
pub use codec::{Hello, MAX_FRAME_SIZE};
pub use error::{ChannelError, ChannelResult};
pub use memory::{MemoryHub, MemoryTransport};
pub use socket::SocketTransport;
pub use transport::{AnnouncementTransport, Subscription};
