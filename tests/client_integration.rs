//! Client behavior against a mocked backend: header injection, envelope
//! decoding, error mapping and the 401 refresh-and-retry flow.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use platform_client::config::AppConfig;
use platform_client::domain::user::CreateUserRequest;
use platform_client::domain::{ApiError, TokenPair};
use platform_client::infrastructure::auth::{InMemoryTokenStore, TokenStore};
use platform_client::infrastructure::http::{ApiClient, NO_QUERY};
use platform_client::Platform;

fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = base_url.to_string();
    config
}

fn raw_client(server: &MockServer) -> (ApiClient, Arc<InMemoryTokenStore>) {
    let config = test_config(&server.uri());
    let store = Arc::new(InMemoryTokenStore::new());
    let client = ApiClient::new(
        &config.api,
        &config.dedup,
        Arc::clone(&store) as Arc<dyn TokenStore>,
    )
    .unwrap();
    (client, store)
}

/// Unsigned token with the given subject; only its payload matters.
fn fake_token(sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": sub }).to_string());
    format!("{header}.{payload}.c2ln")
}

fn item_page_body() -> serde_json::Value {
    json!({
        "status_code": 200,
        "message": "ok",
        "data": {
            "items": [{
                "id": "item-1",
                "title": "First",
                "abstract": "Intro",
                "createdAt": "2025-03-01T08:00:00+07:00",
                "updatedAt": "2025-03-01T08:00:00+07:00",
                "author_id": "user-1"
            }],
            "page_number": 1,
            "page_size": 10,
            "total_items": 1,
            "total_pages": 1
        }
    })
}

#[tokio::test]
async fn test_list_items_decodes_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page_number", "1"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let platform = Platform::new(&test_config(&server.uri())).unwrap();
    let page = platform.items.list(1, 10).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "First");
    assert_eq!(page.total_items, 1);
}

#[tokio::test]
async fn test_every_request_carries_app_id_and_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("app_id", "blog"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let platform = Platform::new(&test_config(&server.uri())).unwrap();
    platform.items.list(1, 10).await.unwrap();
}

#[tokio::test]
async fn test_backend_error_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status_code": 404,
            "message": "Item 'missing' not found",
            "data": null
        })))
        .mount(&server)
        .await;

    let platform = Platform::new(&test_config(&server.uri())).unwrap();
    let error = platform.items.get("missing").await.unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(error.to_string(), "HTTP 404: Item 'missing' not found");
}

#[tokio::test]
async fn test_login_stores_tokens_and_bearer_follows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({"email": "ada@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "message": "ok",
            "data": {"access_token": "access-1", "refresh_token": "refresh-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let platform = Platform::new(&test_config(&server.uri())).unwrap();
    let pair = platform.auth.login("ada@example.com", "secret123").await.unwrap();
    assert_eq!(pair.access_token, "access-1");
    assert!(platform.auth.is_authenticated());

    platform.items.list(1, 10).await.unwrap();
}

#[tokio::test]
async fn test_protected_401_refreshes_and_retries_once() {
    let server = MockServer::start().await;
    let (client, store) = raw_client(&server);
    store.store(TokenPair {
        access_token: fake_token("user-1"),
        refresh_token: "refresh-old".to_string(),
    });

    // First hit on the protected endpoint is rejected.
    Mock::given(method("POST"))
        .and(path("/protected/ping"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    // Refresh must identify the user peeked from the stale access token.
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_partial_json(json!({
            "user_id": "user-1",
            "refresh_token": "refresh-old"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "message": "ok",
            "data": {"access_token": "access-2", "refresh_token": "refresh-2"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The retry carries the fresh token and succeeds.
    Mock::given(method("POST"))
        .and(path("/protected/ping"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "message": "ok",
            "data": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.post("/protected/ping", NO_QUERY, None).await.unwrap();

    assert_eq!(store.access_token().as_deref(), Some("access-2"));
    assert_eq!(store.refresh_token().as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_public_401_passes_through_without_refresh() {
    let server = MockServer::start().await;
    let (client, store) = raw_client(&server);
    store.store(TokenPair {
        access_token: fake_token("user-1"),
        refresh_token: "refresh-old".to_string(),
    });

    Mock::given(method("GET"))
        .and(path("/items/item-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 401,
            "message": "Signature has expired",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = client.get("/items/item-1", NO_QUERY).await.unwrap_err();
    assert!(error.is_unauthorized());
    // The session survives a public-endpoint 401.
    assert!(store.access_token().is_some());
}

#[tokio::test]
async fn test_failed_refresh_propagates_original_401() {
    let server = MockServer::start().await;
    let (client, store) = raw_client(&server);
    store.store(TokenPair {
        access_token: fake_token("user-1"),
        refresh_token: "refresh-old".to_string(),
    });

    Mock::given(method("POST"))
        .and(path("/protected/ping"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 401,
            "message": "Token revoked",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 401,
            "message": "Refresh token expired",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = client
        .post("/protected/ping", NO_QUERY, None)
        .await
        .unwrap_err();
    assert!(error.is_unauthorized());
    // No forced logout: the stale tokens stay until the user acts.
    assert!(store.access_token().is_some());
}

#[tokio::test]
async fn test_search_decodes_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/items"))
        .and(query_param("q", "rust"))
        .and(query_param("k", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "item-1", "score": 2.5}],
            "normalized_query": "rust",
            "search_type": "items"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let platform = Platform::new(&test_config(&server.uri())).unwrap();
    let results = platform
        .search
        .search_items("rust", &Default::default())
        .await
        .unwrap();

    assert_eq!(results.results.len(), 1);
    assert_eq!(results.search_type.as_deref(), Some("items"));
}

#[tokio::test]
async fn test_invalid_create_request_never_reaches_backend() {
    let server = MockServer::start().await;
    // No mounts: any request would fail the test with a 404 anyway, but
    // validation must reject the payload before a connection is made.
    let platform = Platform::new(&test_config(&server.uri())).unwrap();

    let request = CreateUserRequest {
        full_name: "Ada".to_string(),
        email: "not-an-email".to_string(),
        password: "short".to_string(),
        avatar_url: None,
        role: None,
    };
    let error = platform.users.create(&request).await.unwrap_err();
    assert!(matches!(error, ApiError::Validation { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(query_param("user_id", "user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "message": "ok",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let platform = Platform::new(&config).unwrap();
    platform.client().token_store().store(TokenPair {
        access_token: fake_token("user-1"),
        refresh_token: "refresh-1".to_string(),
    });

    platform.auth.logout("user-1").await.unwrap();
    assert!(!platform.auth.is_authenticated());
}
