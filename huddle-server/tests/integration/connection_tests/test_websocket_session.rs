use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use huddle_core::ServerEvent;
use huddle_server::{AppState, OriginPolicy, router};

use crate::integration::init_tracing;
use crate::utils::{SOCKET_TIMEOUT_MS, client_frame, decode_frame, presence};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn next_event(socket: &mut Socket) -> ServerEvent {
    let frame = timeout(Duration::from_millis(SOCKET_TIMEOUT_MS), socket.next())
        .await
        .expect("Timed out waiting for frame")
        .expect("Socket closed")
        .expect("Socket error");
    decode_frame(frame).expect("Undecodable frame")
}

#[tokio::test]
async fn test_websocket_session() {
    init_tracing();

    let state = AppState::new(Vec::new(), OriginPolicy::Any);
    let hub = state.hub.clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    let url = format!("ws://{addr}/ws");
    let (mut alice, _) = connect_async(url.as_str()).await.expect("Alice failed to connect");
    let ServerEvent::Welcome { connection_id: alice_id } = next_event(&mut alice).await else {
        panic!("Expected welcome first");
    };
    assert_eq!(presence(next_event(&mut alice).await).unwrap().len(), 1);

    let (mut bob, _) = connect_async(url.as_str()).await.expect("Bob failed to connect");
    let ServerEvent::Welcome { connection_id: bob_id } = next_event(&mut bob).await else {
        panic!("Expected welcome first");
    };
    assert_ne!(alice_id, bob_id);
    assert_eq!(presence(next_event(&mut alice).await).unwrap().len(), 2);
    assert_eq!(presence(next_event(&mut bob).await).unwrap().len(), 2);

    alice
        .send(client_frame("newUser", json!({ "uid": "u1", "name": "Ann" })))
        .await
        .unwrap();
    let entries = presence(next_event(&mut bob).await).unwrap();
    assert_eq!(entries[0].connection_id, alice_id);
    assert_eq!(entries[0].user_id, "u1");
    presence(next_event(&mut alice).await).unwrap();

    // Garbage is skipped and the session stays usable.
    alice.send("not json".into()).await.unwrap();

    let offer = json!({ "type": "offer", "sdp": "v=0" });
    alice
        .send(client_frame("signal-offer", offer.clone()))
        .await
        .unwrap();
    assert_eq!(next_event(&mut bob).await, ServerEvent::Offer(offer));

    bob.send(client_frame("chat:message", json!({ "message": "hi" })))
        .await
        .unwrap();
    for socket in [&mut alice, &mut bob] {
        let ServerEvent::ChatMessage(message) = next_event(socket).await else {
            panic!("Expected chat message");
        };
        assert_eq!(message.message, "hi");
        assert_eq!(message.user_id, bob_id.to_string());
    }

    bob.close(None).await.unwrap();
    let entries = presence(next_event(&mut alice).await).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].connection_id, alice_id);

    let snapshot = hub.snapshot().await.unwrap();
    assert!(snapshot.iter().all(|entry| entry.connection_id != bob_id));
    assert!(snapshot.iter().any(|entry| entry.connection_id == alice_id));
}
