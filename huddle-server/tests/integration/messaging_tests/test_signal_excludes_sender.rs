use huddle_core::{ServerEvent, SignalKind};
use serde_json::json;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_signal_excludes_sender() {
    init_tracing();

    let (hub, _peers) = create_test_hub();

    let mut sender = TestPeer::connect(&hub).await.unwrap();
    let mut second = TestPeer::connect(&hub).await.unwrap();
    let mut third = TestPeer::connect(&hub).await.unwrap();
    for peer in [&mut sender, &mut second, &mut third] {
        peer.drain().await.unwrap();
    }

    let candidate = json!({ "candidate": "candidate:1 1 udp 2122260223 10.0.0.1 54321 typ host", "sdpMid": "0" });
    hub.signal(sender.connection_id, SignalKind::IceCandidate, candidate.clone())
        .await
        .unwrap();

    for peer in [&mut second, &mut third] {
        assert_eq!(
            peer.next_event().await.unwrap(),
            ServerEvent::IceCandidate(candidate.clone())
        );
    }
    sender.assert_silent().await.unwrap();
}

#[tokio::test]
async fn test_signal_with_single_peer_goes_nowhere() {
    init_tracing();

    let (hub, _peers) = create_test_hub();
    let mut lonely = TestPeer::connect(&hub).await.unwrap();
    lonely.drain().await.unwrap();

    hub.signal(lonely.connection_id, SignalKind::Offer, json!({ "sdp": "v=0" }))
        .await
        .unwrap();

    lonely.assert_silent().await.unwrap();
}
