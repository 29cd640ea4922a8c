//! End-to-end behavior of `ApiClient` against a mock backend.

use std::sync::Arc;

use drishti_fetch::{
    ApiClient, MemoryTokenStore, Method, Query, RequestBody, RequestError, TokenStore,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with(server: &MockServer, tokens: Arc<MemoryTokenStore>) -> ApiClient {
    ApiClient::builder(format!("{}/", server.uri()))
        .token_store(tokens)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_bearer_header_attached_when_token_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session"))
        .and(header("authorization", "Bearer t1"))
        .and(header("content-type", "application/json"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::with_token("t1")));
    let body: Value = client
        .get("/session", &Query::new().param("limit", 20).opt("cursor", None::<&str>))
        .await
        .unwrap();
    assert_eq!(body, json!({ "items": [] }));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "poses": [] })))
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::new()));
    let _: Value = client.get("pose", &Query::new()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_json_body_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "a@b.c", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::new()));
    let body: Value = client
        .post("auth/login", &json!({ "email": "a@b.c", "password": "secret" }))
        .await
        .unwrap();
    assert_eq!(body["token"], "t1");
}

#[tokio::test]
async fn test_empty_success_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/session/s1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::new()));
    let body = client
        .request(Method::DELETE, "session/s1", RequestBody::Empty, &Query::new())
        .await
        .unwrap();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_error_message_from_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Session not found" })),
        )
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::new()));
    let err = client
        .get::<Value>("session/missing", &Query::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Session not found");
}

#[tokio::test]
async fn test_unauthorized_notifies_listener_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid token" })))
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::with_token("stale")));
    let mut listener = client.listen_unauthorized();

    let err = client.get::<Value>("session", &Query::new()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(matches!(err, RequestError::Http { status: 401, .. }));

    // The event is queued before the error is returned.
    let event = listener.try_recv().unwrap();
    assert_eq!(event.status, 401);
    assert_eq!(event.path, "session");
    assert_eq!(event.message, "Invalid token");
    assert!(listener.try_recv().is_none());
}

#[tokio::test]
async fn test_credential_post_401_does_not_notify() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::with_token("current")));
    let mut listener = client.listen_unauthorized();

    let err = client
        .post_credentials::<Value, _>("auth/login", &json!({ "email": "a@b.c", "password": "x" }))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(listener.try_recv().is_none());
}

#[tokio::test]
async fn test_plain_text_error_body_kept_as_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::new()));
    let err = client.get::<Value>("session", &Query::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.data(), Some(&json!("Bad gateway")));
}

#[tokio::test]
async fn test_non_401_errors_do_not_notify() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::with_token("t")));
    let mut listener = client.listen_unauthorized();

    let err = client.get::<Value>("session", &Query::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Forbidden");
    assert!(listener.try_recv().is_none());
}

#[tokio::test]
async fn test_cleared_listener_receives_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryTokenStore::new()));
    let mut listener = client.listen_unauthorized();
    client.clear_unauthorized_listener();

    let err = client.get::<Value>("session", &Query::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 401");
    assert!(listener.recv().await.is_none());
}

#[tokio::test]
async fn test_token_read_per_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("first"));
    let client = client_with(&server, Arc::clone(&tokens));
    assert!(client.get::<Value>("me", &Query::new()).await.is_err());

    tokens.set_token("second").await.unwrap();
    assert!(client.get::<Value>("me", &Query::new()).await.is_ok());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 1.
    let client = ApiClient::builder("http://127.0.0.1:1").build().unwrap();
    let err = client.get::<Value>("session", &Query::new()).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status(), None);
}
