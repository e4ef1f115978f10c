use crate::integration::{create_test_router, init_tracing};
use crate::utils::LoopbackClient;

#[tokio::test]
async fn test_join_without_room_leaves_connection_unbound() {
    init_tracing();

    let router = create_test_router();
    let registry = router.registry().clone();

    let mut client = LoopbackClient::connect(&router);

    for frame in [
        r#"{"type":"join"}"#,
        r#"{"type":"join","room":""}"#,
        r#"{"type":"join","room":null}"#,
    ] {
        client.send_text(frame);
        let reply = client.recv_json().await.unwrap();
        assert_eq!(reply["type"], "error", "frame {} should be rejected", frame);
        assert_eq!(reply["message"], "room is required");
    }

    assert_eq!(registry.room_of(client.id).await, None);
    assert_eq!(registry.stats().await.rooms, 0);

    // still usable afterwards
    assert_eq!(client.join("late").await.unwrap()["clients"], 1);
}

#[tokio::test]
async fn test_unknown_type_is_ignored_without_reply() {
    init_tracing();

    let router = create_test_router();

    let mut client = LoopbackClient::connect(&router);
    client.send_text(r#"{"type":"bye"}"#);
    client.send_text(r#"{"type":"join","room":"after-unknown"}"#);

    // the first reply is the join ack, nothing was emitted for "bye"
    let reply = client.recv_json().await.unwrap();
    assert_eq!(reply["type"], "joined");
    assert_eq!(reply["room"], "after-unknown");
}
