//! Demo login, tenant selection and editing over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use marketstall_integration_tests::{JONAS, MAYA, TestClient, demo_state};

fn tagline(text: &str) -> serde_json::Value {
    json!({ "settings": { "tagline": text, "footer_text": "", "nav_links": [] } })
}

#[tokio::test]
async fn test_vendor_routes_require_login() {
    let mut client = TestClient::new(demo_state());

    for uri in ["/vendor/businesses", "/vendor/selection", "/vendor/draft"] {
        assert_eq!(client.get(uri).await.status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    assert_eq!(
        client.post("/vendor/publish", None).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_login_rejections() {
    let mut client = TestClient::new(demo_state());

    assert_eq!(client.login("not-an-email").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        client.login("stranger@example.com").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        client.get("/vendor/businesses").await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_single_business_vendor_skips_picker() {
    let mut client = TestClient::new(demo_state());

    let login = client.login(JONAS).await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.json["picker_required"], false);
    assert_eq!(login.json["name"], "Jonas Weber");

    let draft = client.get("/vendor/draft").await;
    assert_eq!(draft.status, StatusCode::OK);
    assert_eq!(draft.json["business"]["slug"], "copper-kettle-coffee");
    assert_eq!(draft.json["business"]["lifecycle"], "DRAFT_UNPUBLISHED");
    assert_eq!(draft.json["has_pending_draft"], true);
    assert_eq!(
        draft.json["view"]["description"],
        "Small-batch roasts and brewing gear, shipped fresh."
    );
}

#[tokio::test]
async fn test_multi_business_vendor_must_pick() {
    let mut client = TestClient::new(demo_state());

    let login = client.login(MAYA).await;
    assert_eq!(login.json["picker_required"], true);
    assert_eq!(login.json["businesses"].as_array().unwrap().len(), 2);

    assert_eq!(client.get("/vendor/selection").await.status, StatusCode::NO_CONTENT);
    assert_eq!(client.get("/vendor/draft").await.status, StatusCode::CONFLICT);

    let foreign = client
        .post("/vendor/selection", Some(json!({ "business_id": 3 })))
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let missing = client
        .post("/vendor/selection", Some(json!({ "business_id": 99 })))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let selected = client
        .post("/vendor/selection", Some(json!({ "business_id": 2 })))
        .await;
    assert_eq!(selected.status, StatusCode::OK);
    assert_eq!(selected.json["slug"], "harbor-books");

    let listing = client.get("/vendor/businesses").await;
    assert_eq!(listing.json["selected"], 2);
    assert_eq!(listing.json["picker_required"], false);

    assert_eq!(
        client.delete("/vendor/selection").await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(client.get("/vendor/draft").await.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_edit_publish_cycle_with_versions() {
    let mut client = TestClient::new(demo_state());
    let mut visitor = client.fresh();

    client.login(MAYA).await;
    client
        .post("/vendor/selection", Some(json!({ "business_id": 2 })))
        .await;

    let draft = client.get("/vendor/draft").await;
    assert_eq!(draft.etag_version(), Some(0));
    assert_eq!(draft.json["view"]["settings"]["tagline"], "Stories washed ashore");

    let edited = client
        .send(
            Method::PATCH,
            "/vendor/draft",
            Some(tagline("Open late on Fridays")),
            &[("if-match", "\"0\"")],
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.etag_version(), Some(1));
    assert_eq!(edited.json["view"]["settings"]["tagline"], "Open late on Fridays");

    let stale = client
        .send(
            Method::PATCH,
            "/vendor/draft",
            Some(tagline("Lost update")),
            &[("if-match", "\"0\"")],
        )
        .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);

    // Drafts stay private until published
    let public = visitor.get("/stores/harbor-books").await;
    assert_eq!(public.json["settings"]["tagline"], "Stories washed ashore");

    let published = client
        .send(Method::POST, "/vendor/publish", None, &[("if-match", "\"1\"")])
        .await;
    assert_eq!(published.status, StatusCode::OK);
    assert_eq!(published.json["published"], true);
    assert_eq!(published.json["business"]["lifecycle"], "PUBLISHED_NO_DRAFT");
    assert_eq!(published.etag_version(), Some(2));

    let public = visitor.get("/stores/harbor-books").await;
    assert_eq!(public.json["settings"]["tagline"], "Open late on Fridays");

    let again = client.post("/vendor/publish", None).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.json["published"], false);
    assert_eq!(again.etag_version(), Some(2));
}

#[tokio::test]
async fn test_discard_keeps_public_view() {
    let mut client = TestClient::new(demo_state());
    let mut visitor = client.fresh();
    client.login(MAYA).await;
    client
        .post("/vendor/selection", Some(json!({ "business_id": 1 })))
        .await;

    let before = visitor.get("/stores/green-leaf-market").await.json;

    client
        .send(
            Method::PATCH,
            "/vendor/draft",
            Some(json!({ "contact": { "email": "new@x.com", "phone": "", "address": "" } })),
            &[],
        )
        .await;
    let discarded = client.delete("/vendor/draft").await;
    assert_eq!(discarded.status, StatusCode::OK);
    assert_eq!(discarded.json["has_pending_draft"], false);
    assert_eq!(
        discarded.json["view"]["contact"]["email"],
        "hello@greenleaf.example"
    );

    assert_eq!(visitor.get("/stores/green-leaf-market").await.json, before);
}

#[tokio::test]
async fn test_bad_patches_are_rejected() {
    let mut client = TestClient::new(demo_state());
    client.login(JONAS).await;

    let unknown_field = client
        .send(
            Method::PATCH,
            "/vendor/draft",
            Some(json!({ "colour": "red" })),
            &[],
        )
        .await;
    assert!(unknown_field.status.is_client_error());

    let bad_version = client
        .send(
            Method::PATCH,
            "/vendor/draft",
            Some(tagline("x")),
            &[("if-match", "\"latest\"")],
        )
        .await;
    assert_eq!(bad_version.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_ends_vendor_session() {
    let mut client = TestClient::new(demo_state());
    client.login(JONAS).await;
    assert_eq!(client.get("/vendor/businesses").await.status, StatusCode::OK);

    assert_eq!(
        client.post("/auth/logout", None).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        client.get("/vendor/businesses").await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let mut maya = TestClient::new(demo_state());
    let mut jonas = maya.fresh();

    maya.login(MAYA).await;
    jonas.login(JONAS).await;
    maya.post("/vendor/selection", Some(json!({ "business_id": 1 })))
        .await;

    let jonas_draft = jonas.get("/vendor/draft").await;
    assert_eq!(jonas_draft.json["business"]["id"], 3);

    let maya_draft = maya.get("/vendor/draft").await;
    assert_eq!(maya_draft.json["business"]["id"], 1);
}
