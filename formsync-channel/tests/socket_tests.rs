use formsync_channel::codec::{read_frame, write_frame, Hello};
use formsync_channel::{AnnouncementTransport, CrossContextChannel, SocketTransport};
use formsync_types::{EntityId, Timestamp, UpdateAnnouncement};
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::test]
async fn socket_transport_talks_to_relay() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let relay = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let hello: Hello = read_frame(&mut stream).await.unwrap();
        let published: UpdateAnnouncement = read_frame(&mut stream).await.unwrap();
        let remote = UpdateAnnouncement::new(EntityId::new(100), Timestamp::from_millis(1));
        write_frame(&mut stream, &remote).await.unwrap();
        // Keep the connection open until the client has read the frame.
        tokio::time::sleep(Duration::from_millis(200)).await;
        (hello, published)
    });

    let transport = SocketTransport::connect(addr, "tabs").await.unwrap();
    assert!(transport.is_connected());
    assert_eq!(transport.channel_name(), "tabs");
    let channel = CrossContextChannel::new(transport);
    let mut updates = channel.updates_for(EntityId::new(100));

    let sent = channel.broadcast(EntityId::new(7)).unwrap();

    let remote = tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(remote.ts, Timestamp::from_millis(1));

    let (hello, published) = relay.await.unwrap();
    assert_eq!(hello, Hello::new("tabs"));
    assert_eq!(published, sent);
}

#[tokio::test]
async fn socket_publish_loops_back_locally() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _relay = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });

    let channel = CrossContextChannel::new(SocketTransport::connect(addr, "loop").await.unwrap());
    let mut updates = channel.updates();
    channel.broadcast(EntityId::new(3)).unwrap();
    assert_eq!(updates.try_recv().unwrap().id, EntityId::new(3));
}

#[tokio::test]
async fn connect_to_closed_port_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    assert!(SocketTransport::connect(addr, "tabs").await.is_err());
}
