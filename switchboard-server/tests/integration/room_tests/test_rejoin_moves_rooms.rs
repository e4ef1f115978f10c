use switchboard_core::RoomId;

use crate::integration::{create_test_router, init_tracing};
use crate::utils::LoopbackClient;

#[tokio::test]
async fn test_rejoin_moves_rooms() {
    init_tracing();

    let router = create_test_router();
    let registry = router.registry().clone();
    let first = RoomId::parse("first").unwrap();
    let second = RoomId::parse("second").unwrap();

    let mut mover = LoopbackClient::connect(&router);
    let mut stayer = LoopbackClient::connect(&router);
    let mut newcomer = LoopbackClient::connect(&router);
    mover.join("first").await.unwrap();
    stayer.join("first").await.unwrap();
    newcomer.join("second").await.unwrap();

    let ack = mover.join("second").await.unwrap();
    assert_eq!(ack["clients"], 2);
    assert_eq!(registry.room_size(&first).await, Some(1));
    assert_eq!(registry.room_of(mover.id).await, Some(second.clone()));

    // signaling now follows the new room only
    let offer = r#"{"type":"offer","sdp":"moved"}"#;
    mover.send_text(offer);
    assert_eq!(newcomer.recv_text().await.unwrap(), offer);
    stayer.assert_no_message();

    // moving the last member out deletes the old room
    stayer.join("second").await.unwrap();
    assert!(!registry.contains_room(&first).await);
    assert_eq!(registry.room_size(&second).await, Some(3));
}
