//! Public storefront routes through the full router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use marketstall_integration_tests::{TestClient, demo_state};

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new(demo_state());
    let response = client.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_published_store_shows_published_settings() {
    let mut client = TestClient::new(demo_state());
    let response = client.get("/stores/green-leaf-market").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json["settings"]["tagline"],
        "Fresh from the farm, every morning"
    );
    assert_eq!(response.json["theme"]["primary"], "#276749");
    // Not overridden, so the baseline shows through
    assert_eq!(response.json["contact"]["email"], "hello@greenleaf.example");
}

#[tokio::test]
async fn test_unpublished_draft_never_reaches_public() {
    let mut client = TestClient::new(demo_state());
    let response = client.get("/stores/copper-kettle-coffee").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json["description"],
        "Small-batch roasts shipped the day they cool."
    );
    assert!(response.json.get("draft").is_none());
    assert!(response.json.get("published").is_none());
}

#[tokio::test]
async fn test_unknown_and_malformed_slugs_are_not_found() {
    let mut client = TestClient::new(demo_state());

    assert_eq!(
        client.get("/stores/no-such-shop").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get("/stores/Not%20A%20Slug").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let mut client = TestClient::new(demo_state());
    let response = client
        .send(
            axum::http::Method::GET,
            "/stores/harbor-books",
            None,
            &[("x-request-id", "edge-abc")],
        )
        .await;

    assert_eq!(response.headers.get("x-request-id").unwrap(), "edge-abc");
}
