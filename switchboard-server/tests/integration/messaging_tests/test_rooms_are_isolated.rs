use crate::integration::{create_test_router, init_tracing};
use crate::utils::LoopbackClient;

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();

    let router = create_test_router();

    let mut a = LoopbackClient::connect(&router);
    let mut b = LoopbackClient::connect(&router);
    let mut outsider = LoopbackClient::connect(&router);
    a.join("x").await.unwrap();
    b.join("x").await.unwrap();
    outsider.join("y").await.unwrap();

    let candidate = r#"{"type":"ice-candidate","candidate":"candidate:1 1 UDP 2122252543 10.0.0.2 54321 typ host","sdpMid":"0"}"#;
    a.send_text(candidate);

    assert_eq!(b.recv_text().await.unwrap(), candidate);
    outsider.assert_no_message();
    a.assert_no_message();
}

#[tokio::test]
async fn test_room_field_on_signaling_is_not_used_for_routing() {
    init_tracing();

    let router = create_test_router();

    let mut a = LoopbackClient::connect(&router);
    let mut b = LoopbackClient::connect(&router);
    let mut other = LoopbackClient::connect(&router);
    a.join("x").await.unwrap();
    b.join("x").await.unwrap();
    other.join("y").await.unwrap();

    let answer = r#"{"type":"answer","room":"y","sdp":"Z"}"#;
    a.send_text(answer);

    assert_eq!(b.recv_text().await.unwrap(), answer);
    other.assert_no_message();
}

#[tokio::test]
async fn test_signaling_before_join_is_rejected() {
    init_tracing();

    let router = create_test_router();

    let mut loner = LoopbackClient::connect(&router);
    loner.send_text(r#"{"type":"offer","sdp":"X"}"#);

    let reply = loner.recv_json().await.unwrap();
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["message"], "not in a room");
}
