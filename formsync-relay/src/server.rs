//! Relay socket server.

use crate::hub::Hub;
use formsync_channel::codec::{read_frame, write_frame, Hello};
use formsync_channel::{ChannelError, ChannelResult};
use formsync_types::UpdateAnnouncement;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// Pause after a failed accept, so an exhausted fd table is not spun on.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts connections forever, one task per connection. Accept errors are
/// logged and the loop keeps going.
pub async fn serve(listener: TcpListener, hub: Arc<Hub>) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        let hub = hub.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, addr, hub).await {
                warn!("Connection from {} failed: {}", addr, e);
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, addr: SocketAddr, hub: Arc<Hub>) -> ChannelResult<()> {
    stream.set_nodelay(true)?;
    let (mut read_half, mut write_half) = stream.into_split();

    let hello: Hello = read_frame(&mut read_half).await?;
    let channel = hello.channel;
    let (peer, mut outbound) = hub.join(&channel);
    info!("Peer {} ({}) joined channel {}", peer, addr, channel);

    let writer = tokio::spawn(async move {
        while let Some(ann) = outbound.recv().await {
            if let Err(e) = write_frame(&mut write_half, &ann).await {
                debug!("Write to peer {} failed: {}", peer, e);
                break;
            }
        }
    });

    loop {
        match read_frame::<UpdateAnnouncement, _>(&mut read_half).await {
            Ok(ann) => {
                hub.relay(&channel, peer, ann);
            }
            Err(ChannelError::Serialization(e)) => {
                warn!("Dropping malformed frame from peer {}: {}", peer, e);
            }
            Err(ChannelError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => {
                warn!("Read from peer {} failed: {}", peer, e);
                break;
            }
        }
    }

    hub.leave(&channel, peer);
    writer.abort();
    info!("Peer {} left channel {}", peer, channel);
    Ok(())
}
