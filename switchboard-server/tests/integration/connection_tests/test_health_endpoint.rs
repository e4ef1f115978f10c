use reqwest::StatusCode;
use switchboard_server::HealthReport;

use crate::integration::init_tracing;
use crate::utils::{TestServer, ws_recv_json, ws_send};

#[tokio::test]
async fn test_health_endpoint_reports_registry_sizes() {
    init_tracing();

    let server = TestServer::start().await.expect("server failed to start");

    let (status, report) = server.health("/health").await.expect("health request");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report,
        HealthReport {
            status: "healthy".to_owned(),
            rooms: 0,
            total_clients: 0,
        }
    );

    let mut ws1 = server.connect().await.unwrap();
    let mut ws2 = server.connect().await.unwrap();
    ws_send(&mut ws1, r#"{"type":"join","room":"r1"}"#).await.unwrap();
    ws_recv_json(&mut ws1).await.unwrap();
    ws_send(&mut ws2, r#"{"type":"join","room":"r2"}"#).await.unwrap();
    ws_recv_json(&mut ws2).await.unwrap();

    let (status, report) = server.health("/").await.expect("root request");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report.rooms, 2);
    assert_eq!(report.total_clients, 2);

    drop(ws1);
    drop(ws2);
    server.stop().await.expect("server did not stop cleanly");
}
