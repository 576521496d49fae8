use huddle_core::{ConnectionEntry, Identity};

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_peer_disconnect_republishes() {
    init_tracing();

    let (hub, peers) = create_test_hub();

    let mut first = TestPeer::connect(&hub).await.unwrap();
    let mut second = TestPeer::connect(&hub).await.unwrap();
    first
        .announce(Identity::structured(Some("u1"), Some("Ann")))
        .await
        .unwrap();
    first.drain().await.unwrap();
    second.drain().await.unwrap();

    second.disconnect().await.unwrap();

    let entries = first.single_presence().await.unwrap();
    assert_eq!(
        entries,
        vec![ConnectionEntry {
            connection_id: first.connection_id,
            user_id: "u1".to_owned(),
            display_name: Some("Ann".to_owned()),
        }]
    );
    assert!(!peers.contains(&second.connection_id));
    assert_eq!(hub.snapshot().await.unwrap(), entries);

    // A second disconnect for the same handle changes nothing.
    second.disconnect().await.unwrap();
    first.assert_silent().await.unwrap();
}
