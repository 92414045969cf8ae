use dashlink_sync::compressor::{
    CompressorConfig, HttpCompressor, MemoryCompressor, StateCompressor,
};
use dashlink_sync::SyncError;
use dashlink_types::LocatorToken;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn deps() -> Vec<String> {
    vec!["data".to_string()]
}

fn client(server: &MockServer) -> HttpCompressor {
    HttpCompressor::new(CompressorConfig {
        base_url: format!("{}/jax/", server.uri()),
        timeout_secs: 5,
    })
    .unwrap()
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn compressor_config_default() {
    let cfg = CompressorConfig::default();
    assert_eq!(cfg.base_url, "http://localhost:8080/jax");
    assert_eq!(cfg.timeout_secs, 30);
}

#[test]
fn compressor_config_serde_roundtrip() {
    let cfg = CompressorConfig {
        base_url: "https://dash.example/jax".to_string(),
        timeout_secs: 3,
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: CompressorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn empty_base_url_is_rejected() {
    let result = HttpCompressor::new(CompressorConfig {
        base_url: String::new(),
        ..Default::default()
    });
    assert!(matches!(result, Err(SyncError::Config(_))));
}

#[test]
fn backend_names() {
    let http = HttpCompressor::new(CompressorConfig::default()).unwrap();
    assert_eq!(http.backend_name(), "HTTP");
    assert_eq!(MemoryCompressor::new().backend_name(), "memory");
}

// ── HTTP store ──────────────────────────────────────────────────

#[tokio::test]
async fn http_store_posts_content_and_dependencies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jax/compressor"))
        .and(body_json(json!({
            "content": {"main": null, "south": [{"type": "A"}]},
            "dependencies": ["data"]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": "eJyrVkrOzytJzSvR"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = client(&server)
        .store(&json!({"main": null, "south": [{"type": "A"}]}), &deps())
        .await
        .unwrap();

    assert_eq!(token, LocatorToken::new("eJyrVkrOzytJzSvR"));
}

#[tokio::test]
async fn http_store_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jax/compressor"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).store(&json!({}), &deps()).await.unwrap_err();

    match err {
        SyncError::Compressor { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Compressor error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_store_rejects_unexpected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jax/compressor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": 1})))
        .mount(&server)
        .await;

    let err = client(&server).store(&json!({}), &deps()).await.unwrap_err();

    assert!(matches!(err, SyncError::Network(_)));
}

// ── HTTP fetch ──────────────────────────────────────────────────

#[tokio::test]
async fn http_fetch_sends_dependencies_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jax/compressor/T1"))
        .and(query_param("dependencies", "data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"main": {"type": "p"}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let content = client(&server)
        .fetch(&LocatorToken::new("T1"), &deps())
        .await
        .unwrap();

    assert_eq!(content, json!({"main": {"type": "p"}}));
}

#[tokio::test]
async fn http_fetch_encodes_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jax/compressor/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [1]})))
        .mount(&server)
        .await;

    let content = client(&server)
        .fetch(&LocatorToken::new("a/b"), &[])
        .await
        .unwrap();

    assert_eq!(content, json!([1]));
}

#[tokio::test]
async fn http_fetch_missing_data_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jax/compressor/T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let content = client(&server)
        .fetch(&LocatorToken::new("T1"), &deps())
        .await
        .unwrap();

    assert!(content.is_null());
}

#[tokio::test]
async fn http_fetch_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jax/compressor/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch(&LocatorToken::new("gone"), &deps())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::TokenNotFound(token) if token == "gone"));
}

#[tokio::test]
async fn http_unreachable_is_network_error() {
    let compressor = HttpCompressor::new(CompressorConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
    })
    .unwrap();

    let err = compressor.store(&json!({}), &deps()).await.unwrap_err();

    assert!(matches!(err, SyncError::Network(_)));
}

// ── Memory ──────────────────────────────────────────────────────

#[tokio::test]
async fn memory_issues_sequential_tokens() {
    let compressor = MemoryCompressor::new();

    let a = compressor.store(&json!({"n": 1}), &deps()).await.unwrap();
    let b = compressor.store(&json!({"n": 2}), &deps()).await.unwrap();

    assert_eq!(a, LocatorToken::new("T1"));
    assert_eq!(b, LocatorToken::new("T2"));
    assert_eq!(compressor.fetch(&b, &deps()).await.unwrap(), json!({"n": 2}));
}

#[tokio::test]
async fn memory_reuses_token_for_same_payload() {
    let compressor = MemoryCompressor::new();

    let a = compressor.store(&json!({"n": 1}), &deps()).await.unwrap();
    let b = compressor.store(&json!({"n": 1}), &deps()).await.unwrap();
    let c = compressor.store(&json!({"n": 1}), &[]).await.unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(compressor.store_calls(), 3);
}

#[tokio::test]
async fn memory_never_reissues_inserted_token() {
    let compressor = MemoryCompressor::new();
    let saved = json!({"main": {"type": "portfolio"}});
    compressor.insert(LocatorToken::new("T1"), saved.clone());
    compressor.insert(LocatorToken::new("T2"), json!({}));

    let token = compressor
        .store(&json!({"main": null, "south": [{"type": "A"}]}), &deps())
        .await
        .unwrap();

    assert_eq!(token, LocatorToken::new("T3"));
    assert_eq!(compressor.peek(&LocatorToken::new("T1")), Some(saved));
}

#[tokio::test]
async fn memory_unknown_token() {
    let compressor = MemoryCompressor::new();

    let err = compressor
        .fetch(&LocatorToken::new("nope"), &deps())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::TokenNotFound(_)));
    assert_eq!(compressor.fetch_calls(), 1);
}

#[tokio::test]
async fn memory_failing_mode() {
    let compressor = MemoryCompressor::new();
    compressor.set_failing(true);

    assert!(matches!(
        compressor.store(&json!({}), &deps()).await,
        Err(SyncError::Network(_))
    ));

    compressor.set_failing(false);
    assert!(compressor.store(&json!({}), &deps()).await.is_ok());
}
