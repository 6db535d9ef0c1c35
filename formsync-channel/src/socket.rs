//! Socket transport linking separate processes through `formsync-relay`.

use crate::codec::{read_frame, write_frame, Hello};
use crate::error::{ChannelError, ChannelResult};
use crate::memory::CHANNEL_CAPACITY;
use crate::transport::{AnnouncementTransport, Subscription};
use formsync_types::UpdateAnnouncement;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A connection to a relay, joined to one channel.
///
/// Published announcements are delivered to local subscribers immediately
/// and queued for the relay, which forwards them to every other connection
/// on the same channel. Announcements arriving from the relay are delivered
/// to local subscribers.
#[derive(Debug)]
pub struct SocketTransport {
    name: String,
    local: broadcast::Sender<UpdateAnnouncement>,
    outbound: mpsc::UnboundedSender<UpdateAnnouncement>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl SocketTransport {
    /// Connects to a relay and joins `channel`.
    pub async fn connect(addr: impl ToSocketAddrs, channel: impl Into<String>) -> ChannelResult<Self> {
        let name = channel.into();
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        let (mut read_half, mut write_half) = stream.into_split();

        write_frame(&mut write_half, &Hello::new(name.clone())).await?;
        info!("Joined channel {} on relay {}", name, peer);

        let (local, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<UpdateAnnouncement>();

        let inbound = local.clone();
        let reader_name = name.clone();
        let reader = tokio::spawn(async move {
            loop {
                match read_frame::<UpdateAnnouncement, _>(&mut read_half).await {
                    Ok(ann) => {
                        debug!("Received {:?} on {}", ann, reader_name);
                        let _ = inbound.send(ann);
                    }
                    Err(ChannelError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                        info!("Relay closed channel {}", reader_name);
                        break;
                    }
                    Err(ChannelError::Serialization(e)) => {
                        warn!("Dropping malformed frame on {}: {}", reader_name, e);
                    }
                    Err(e) => {
                        warn!("Relay read failed on {}: {}", reader_name, e);
                        break;
                    }
                }
            }
        });

        let writer_name = name.clone();
        let writer = tokio::spawn(async move {
            while let Some(ann) = outbound_rx.recv().await {
                if let Err(e) = write_frame(&mut write_half, &ann).await {
                    warn!("Relay write failed on {}: {}", writer_name, e);
                    break;
                }
            }
        });

        Ok(Self {
            name,
            local,
            outbound,
            reader,
            writer,
        })
    }

    /// Whether the writer task is still forwarding to the relay.
    pub fn is_connected(&self) -> bool {
        !self.writer.is_finished() && !self.outbound.is_closed()
    }
}

impl AnnouncementTransport for SocketTransport {
    fn channel_name(&self) -> &str {
        &self.name
    }

    fn publish(&self, announcement: UpdateAnnouncement) -> ChannelResult<()> {
        let _ = self.local.send(announcement);
        self.outbound
            .send(announcement)
            .map_err(|_| ChannelError::ChannelClosed)
    }

    fn subscribe(&self) -> Subscription {
        self.local.subscribe()
    }
}

impl Drop for SocketTransport {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}
