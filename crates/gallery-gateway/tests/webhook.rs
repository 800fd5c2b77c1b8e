//! End-to-end tests against a real listener and a stand-in webhook

use gallery_gateway::server::bind_with_shutdown;
use gallery_gateway::{AccessEvent, AccessSink, Gateway, GatewayConfig, WebhookSink};
use gallery_test_utils::{ImageDirFixture, TINY_PNG};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use warp::http::StatusCode;
use warp::Filter;

/// Local webhook answering `status`, forwarding every JSON body it receives
fn spawn_webhook(status: StatusCode) -> (SocketAddr, mpsc::UnboundedReceiver<serde_json::Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let hook = warp::post()
        .and(warp::path("hook"))
        .and(warp::body::json())
        .map(move |body: serde_json::Value| {
            let _ = tx.send(body);
            warp::reply::with_status("", status)
        });

    let (addr, server) = warp::serve(hook).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, rx)
}

fn webhook_url(addr: SocketAddr) -> String {
    format!("http://{addr}/hook")
}

/// Binds the gateway on an ephemeral port; dropping the sender stops it
fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, oneshot::Sender<()>) {
    let gateway = Arc::new(Gateway::new(config).unwrap());
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let (addr, server) = bind_with_shutdown(gateway, ([127, 0, 0, 1], 0).into(), async {
        let _ = stop_rx.await;
    })
    .unwrap();
    tokio::spawn(server);
    (addr, stop_tx)
}

#[tokio::test]
async fn webhook_sink_posts_json() {
    let (addr, mut rx) = spawn_webhook(StatusCode::OK);
    let sink = WebhookSink::new(&webhook_url(addr), Duration::from_secs(2)).unwrap();

    sink.deliver(&AccessEvent::new("a.png", "192.0.2.1", "ua/1"))
        .await
        .unwrap();

    let body = rx.recv().await.unwrap();
    assert_eq!(body["type"], "Image Access");
    assert_eq!(body["filename"], "a.png");
    assert_eq!(body["ip"], "192.0.2.1");
    assert_eq!(body["userAgent"], "ua/1");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (addr, _rx) = spawn_webhook(StatusCode::SERVICE_UNAVAILABLE);
    let sink = WebhookSink::new(&webhook_url(addr), Duration::from_secs(2)).unwrap();

    let err = sink
        .deliver(&AccessEvent::new("a.png", "192.0.2.1", ""))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "webhook responded with status 503");
}

#[tokio::test]
async fn unreachable_webhook_is_a_transport_error() {
    let sink = WebhookSink::new("http://127.0.0.1:1/hook", Duration::from_millis(500)).unwrap();
    let err = sink
        .deliver(&AccessEvent::new("a.png", "192.0.2.1", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, gallery_gateway::TelemetryError::Transport(_)));
}

#[tokio::test]
async fn each_request_posts_one_event() {
    let fixture = ImageDirFixture::new();
    let (hook_addr, mut events) = spawn_webhook(StatusCode::OK);
    let config = GatewayConfig::new()
        .with_image_dir(fixture.image_dir())
        .with_webhook_url(webhook_url(hook_addr));
    let (addr, _stop) = spawn_gateway(config);

    let client = reqwest::Client::new();
    let names = ["existing.png", "missing.png", "photo.jpg"];
    for name in names {
        client
            .get(format!("http://{addr}/view-image/{name}"))
            .header("user-agent", "e2e")
            .send()
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    for _ in names {
        let body = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body["ip"], "127.0.0.1");
        assert_eq!(body["userAgent"], "e2e");
        seen.push(body["filename"].as_str().unwrap().to_string());
    }
    seen.sort();
    assert_eq!(seen, ["existing.png", "missing.png", "photo.jpg"]);

    let extra = tokio::time::timeout(Duration::from_millis(200), events.recv()).await;
    assert!(extra.is_err());
}

#[tokio::test]
async fn served_over_real_socket_with_dead_webhook() {
    let fixture = ImageDirFixture::new();
    let config = GatewayConfig::new()
        .with_image_dir(fixture.image_dir())
        .with_webhook_url("http://127.0.0.1:1/hook");
    let (addr, _stop) = spawn_gateway(config);

    let response = reqwest::get(format!("http://{addr}/view-image/existing.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(response.bytes().await.unwrap().as_ref(), TINY_PNG);

    let response = reqwest::get(format!("http://{addr}/view-image/missing.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "Image not found.");
}

#[tokio::test]
async fn bind_conflict_is_reported() {
    let fixture = ImageDirFixture::new();
    let config = GatewayConfig::new().with_image_dir(fixture.image_dir());
    let (taken, _stop) = spawn_gateway(config.clone());

    let gateway = Arc::new(Gateway::new(config).unwrap());
    let result = bind_with_shutdown(gateway, taken, std::future::pending());
    assert!(matches!(
        result,
        Err(gallery_gateway::GatewayError::Bind { .. })
    ));
}
