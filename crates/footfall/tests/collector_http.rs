//! Wire-contract test for the fire-and-forget collector.

use std::time::Duration;

use footfall::Collector;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Poll until the spawned send lands; delivery is fire-and-forget so there
/// is nothing to await directly.
async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<wiremock::Request> {
    for _ in 0..50 {
        let received = server.received_requests().await.unwrap_or_default();
        if received.len() >= count {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    server.received_requests().await.unwrap_or_default()
}

#[tokio::test]
async fn collector_posts_plaintext_json_to_the_post_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post"))
        .and(header("content-type", "text/plain; charset=UTF-8"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let collector = Collector::new(&format!("{}/", server.uri()));
    collector.submit(
        r#"{"hostname":"example.com","width":1280,"height":800,"pageviews":[{"path":"/a","time":0}]}"#
            .to_string(),
    );

    let received = wait_for_requests(&server, 1).await;
    assert_eq!(received.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&received[0].body).expect("JSON body");
    assert_eq!(body["hostname"], "example.com");
    assert_eq!(body["pageviews"][0]["path"], "/a");
}

#[tokio::test]
async fn beacon_uses_the_same_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let collector = Collector::new(&format!("{}/", server.uri()));
    collector.beacon(r#"{"hostname":"example.com","width":1,"height":1,"pageviews":[],"time":3}"#.to_string());

    let received = wait_for_requests(&server, 1).await;
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).expect("JSON body");
    assert_eq!(body["time"], 3);
}

#[tokio::test]
async fn delivery_failure_is_never_surfaced() {
    // Nothing is listening on this endpoint; submit must not panic or block.
    let collector = Collector::new("http://127.0.0.1:9/");
    collector.submit("{}".to_string());
    tokio::time::sleep(Duration::from_millis(50)).await;
}
