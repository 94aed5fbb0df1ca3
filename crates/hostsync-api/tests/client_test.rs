#![allow(clippy::unwrap_used)]
// Integration tests for `TowerClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use hostsync_api::{Error, Method, TowerClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(uri: &str, timeout: Duration) -> TowerClient {
    let password = SecretString::from("hunter2".to_owned());
    let transport = TransportConfig {
        verify_tls: true,
        timeout,
    };
    TowerClient::new(uri, "v2", "admin", &password, &transport).unwrap()
}

/// A local address with nothing listening on it.
fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn setup() -> (MockServer, TowerClient) {
    let server = MockServer::start().await;
    let client = client_for(&server.uri(), Duration::from_secs(5));
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_sends_basic_auth_and_parses_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/inventories"))
        .and(query_param("name", "Lab"))
        .and(basic_auth("admin", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{ "id": 7, "name": "Lab" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.get("inventories?name=Lab").await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.field("count"), Some(&json!(1)));
    assert_eq!(resp.json["results"][0]["id"], json!(7));
}

#[tokio::test]
async fn test_get_sends_no_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/ping/"))
        .and(|req: &Request| req.body.is_empty())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ha": false })))
        .expect(1)
        .mount(&server)
        .await;

    client.get("ping").await.unwrap();
}

#[tokio::test]
async fn test_post_sends_json_payload() {
    let (server, client) = setup().await;

    let payload = json!({ "name": "web01", "inventory": 7 });

    Mock::given(method("POST"))
        .and(path("/api/v2/hosts/"))
        .and(header("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.post("hosts", &payload).await.unwrap();

    assert_eq!(resp.status, 201);
    assert_eq!(resp.json["id"], json!(42));
}

#[tokio::test]
async fn test_patch_via_generic_request() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v2/hosts/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .request(Method::PATCH, "hosts/42", Some(&json!({ "enabled": true })))
        .await
        .unwrap();

    assert_eq!(resp.json["id"], json!(42));
}

#[tokio::test]
async fn test_empty_success_body_is_empty_map() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v2/hosts/42/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let resp = client.patch("hosts/42", &json!({})).await.unwrap();

    assert_eq!(resp.status, 204);
    assert!(resp.json.is_empty());
    assert!(resp.body.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_2xx_is_api_error_with_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/hosts/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "name": ["Host with this Name already exists."] })),
        )
        .mount(&server)
        .await;

    let result = client.post("hosts", &json!({ "name": "web01" })).await;

    match result {
        Err(Error::Api { status, ref body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("already exists"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_auth_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authentication credentials were not provided."))
        .mount(&server)
        .await;

    let result = client.get("me").await;

    assert!(
        matches!(result, Err(Error::Api { status: 401, .. })),
        "expected HTTP 401, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/inventories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&server)
        .await;

    let result = client.get("inventories?name=Lab").await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert_eq!(body, "<html>proxy login</html>");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_object_success_body_is_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let result = client.get("hosts").await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    let client = client_for(&server.uri(), Duration::from_millis(200));

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client.get("hosts").await;

    match result {
        Err(Error::Timeout { ref url, timeout }) => {
            assert!(url.ends_with("/api/v2/hosts/"));
            assert_eq!(timeout, Duration::from_millis(200));
        }
        other => panic!("expected Timeout error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let uri = closed_port_uri();
    let client = client_for(&uri, Duration::from_secs(2));

    let result = client.get("ping").await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected transport error, got: {result:?}"
    );
}
