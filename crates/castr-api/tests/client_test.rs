#![allow(clippy::unwrap_used)]
// Integration tests for `CastrClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use castr_api::{CastrClient, Credentials, Error, LiveStream, Method};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CastrClient) {
    let server = MockServer::start().await;
    let base = format!("{}/v2", server.uri());
    let creds = Credentials::new("tok", "sek".to_string().into());
    let client = CastrClient::with_client(&base, reqwest::Client::new(), creds).unwrap();
    (server, client)
}

// ── Live streams ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_live_streams_sends_basic_auth() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/live_streams"))
        .and(basic_auth("tok", "sek"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [
                {
                    "_id": "s1",
                    "name": "Main",
                    "enabled": true,
                    "ingest": { "server": "rtmp://in", "key": "k1" },
                    "platforms": [{ "_id": "p1", "name": "yt", "enabled": true }]
                },
                { "_id": "broken" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.list_live_streams().await.unwrap();
    assert_eq!(page.docs.len(), 2);

    let decoded: Vec<_> = page
        .docs
        .into_iter()
        .map(LiveStream::from_value)
        .collect();
    assert!(decoded[0].is_ok());
    assert!(decoded[1].is_err());
    assert_eq!(decoded[0].as_ref().unwrap().platforms[0].id, "p1");
}

#[tokio::test]
async fn test_set_stream_enabled_patches_sub_resource() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/v2/live_streams/s1"))
        .and(body_json(json!({ "enabled": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.set_stream_enabled("s1", true).await.unwrap();
    assert_eq!(resp, json!({ "ok": true }));
}

#[tokio::test]
async fn test_set_platform_enabled_patches_nested_resource() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/v2/live_streams/s2/platforms/p1"))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.set_platform_enabled("s2", "p1", false).await.unwrap();
    assert!(resp.is_null());
}

#[tokio::test]
async fn test_generic_call_with_suffix() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/live_streams/s9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "s9" })))
        .mount(&server)
        .await;

    let value = client
        .call(Method::GET, "live_streams", Some("s9"), None)
        .await
        .unwrap();
    assert_eq!(value["_id"], "s9");
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/live_streams"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_live_streams().await;
    match result {
        Err(ref e @ Error::Authentication { ref message }) => {
            assert!(e.is_auth_failure());
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_api_error_with_message() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/v2/live_streams/s1"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "stream is locked" })),
        )
        .mount(&server)
        .await;

    let err = client.set_stream_enabled("s1", false).await.unwrap_err();
    assert!(
        matches!(err, Error::Api { status: 422, ref message } if message == "stream is locked"),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn test_error_without_body_uses_status_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/live_streams"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_live_streams().await.unwrap_err();
    assert!(
        matches!(err, Error::Api { status: 503, ref message } if message == "Service Unavailable"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/live_streams"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client.list_live_streams().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let creds = Credentials::new("tok", "sek".to_string().into());
    let client =
        CastrClient::with_client("http://127.0.0.1:1/v2/", reqwest::Client::new(), creds).unwrap();

    let err = client.list_live_streams().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
}
