use dashlink_inspect::{decode_layout, encode_layout, fingerprint_rows, render_rows};
use dashlink_sync::{CompressorConfig, HttpCompressor, MemoryCompressor};
use dashlink_types::{Config, LayoutState, LocatorToken, PanelName};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn deps() -> Vec<String> {
    vec!["data".to_string()]
}

#[tokio::test]
async fn encode_then_decode_through_memory() {
    let compressor = MemoryCompressor::new();
    let content = json!({"main": {"type": "portfolio"}, "south": [{"type": "A"}], "extra": 1});

    let token = encode_layout(&compressor, content, &deps()).await.unwrap();
    let layout = decode_layout(&compressor, &token, &deps()).await.unwrap();

    assert_eq!(layout.main, Some(Config::new(json!({"type": "portfolio"}))));
    assert_eq!(layout.panel(PanelName::South).len(), 1);
    // Unknown keys are dropped before storing.
    assert_eq!(
        compressor.peek(&token),
        Some(json!({"main": {"type": "portfolio"}, "south": [{"type": "A"}]}))
    );
}

#[tokio::test]
async fn encode_rejects_non_layout() {
    let compressor = MemoryCompressor::new();

    let err = encode_layout(&compressor, json!([1, 2]), &deps())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not a layout"));
    assert_eq!(compressor.store_calls(), 0);
}

#[tokio::test]
async fn decode_reports_token_in_context() {
    let compressor = MemoryCompressor::new();

    let err = decode_layout(&compressor, &LocatorToken::new("T404"), &deps())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("T404"));
}

#[tokio::test]
async fn decode_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jax/compressor/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"dock-north": [{"type": "B"}]}
        })))
        .mount(&server)
        .await;
    let compressor = HttpCompressor::new(CompressorConfig {
        base_url: format!("{}/jax", server.uri()),
        timeout_secs: 5,
    })
    .unwrap();

    let layout = decode_layout(&compressor, &LocatorToken::new("abc"), &deps())
        .await
        .unwrap();

    assert_eq!(
        layout.panel(PanelName::DockNorth),
        &[Config::new(json!({"type": "B"}))]
    );
}

#[test]
fn rows_follow_main_then_panel_order() {
    let layout = LayoutState::new()
        .with_main(Config::new(json!({"type": "portfolio"})))
        .with_panel(PanelName::DockSouth, vec![Config::new(json!({"type": "C"}))])
        .with_panel(
            PanelName::South,
            vec![Config::new(json!({"b": 1, "a": 2})), Config::new(json!({"type": "B"}))],
        );

    let rows = fingerprint_rows(&layout).unwrap();

    let slots: Vec<_> = rows.iter().map(|r| r.slot.as_str()).collect();
    assert_eq!(slots, vec!["main", "south[0]", "south[1]", "dock-south[0]"]);
    assert_eq!(rows[1].fingerprint, r#"{"a":2,"b":1}"#);
    assert_eq!(rows[1].short.len(), 12);
}

#[test]
fn rendered_rows_are_aligned() {
    let layout = LayoutState::new()
        .with_main(Config::new(json!({"type": "portfolio"})))
        .with_panel(PanelName::DockCenter, vec![Config::new(json!({"type": "A"}))]);
    let rows = fingerprint_rows(&layout).unwrap();

    let text = render_rows(&rows);

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("main            "));
    assert!(lines[1].starts_with("dock-center[0]  "));
    assert!(lines[1].ends_with(r#"{"type":"A"}"#));
}

#[test]
fn empty_layout_has_no_rows() {
    assert!(fingerprint_rows(&LayoutState::new()).unwrap().is_empty());
    assert_eq!(render_rows(&[]), "");
}
