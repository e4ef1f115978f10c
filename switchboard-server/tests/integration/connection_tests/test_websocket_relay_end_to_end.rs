use switchboard_core::RoomId;

use crate::integration::init_tracing;
use crate::utils::{TestServer, eventually, ws_recv_json, ws_recv_text, ws_send};

#[tokio::test]
async fn test_websocket_relay_end_to_end() {
    init_tracing();

    let server = TestServer::start().await.expect("server failed to start");
    let registry = server.state.registry.clone();
    let room = RoomId::parse("call-42").unwrap();

    let mut caller = server.connect().await.unwrap();
    let mut callee = server.connect().await.unwrap();

    ws_send(&mut caller, r#"{"type":"join","room":"call-42"}"#)
        .await
        .unwrap();
    let ack = ws_recv_json(&mut caller).await.unwrap();
    assert_eq!(
        ack,
        serde_json::json!({"type": "joined", "room": "call-42", "clients": 1})
    );

    ws_send(&mut callee, r#"{"type":"join","room":"call-42"}"#)
        .await
        .unwrap();
    assert_eq!(ws_recv_json(&mut callee).await.unwrap()["clients"], 2);

    let offer = r#"{"type":"offer","sdp":"v=0\r\no=- 1 2 IN IP4 127.0.0.1","meta":{"x":[1,2]}}"#;
    ws_send(&mut caller, offer).await.unwrap();
    assert_eq!(ws_recv_text(&mut callee).await.unwrap(), offer);

    let answer = r#"{"type":"answer","sdp":"v=0"}"#;
    ws_send(&mut callee, answer).await.unwrap();
    assert_eq!(ws_recv_text(&mut caller).await.unwrap(), answer);

    ws_send(&mut caller, "not json").await.unwrap();
    assert_eq!(
        ws_recv_json(&mut caller).await.unwrap(),
        serde_json::json!({"type": "error", "message": "invalid format"})
    );

    caller.close(None).await.unwrap();
    assert!(
        eventually(|| {
            let registry = registry.clone();
            let room = room.clone();
            async move { registry.room_size(&room).await == Some(1) }
        })
        .await,
        "closing the caller should shrink the room"
    );

    drop(callee);
    assert!(
        eventually(|| {
            let registry = registry.clone();
            async move { registry.stats().await.rooms == 0 }
        })
        .await,
        "dropping the callee's socket should delete the room"
    );

    server.stop().await.expect("server did not stop cleanly");
}
