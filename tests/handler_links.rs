mod common;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use link_shortener::AppState;
use link_shortener::api::dto::link::{DeactivateResponse, LinkResponse};
use link_shortener::infrastructure::analytics::NullAnalytics;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{CollidingLinkRepository, InMemoryApiKeyRepository, TEST_KEY};

fn server() -> (TestServer, common::TestContext) {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();
    (server, ctx)
}

#[tokio::test]
async fn test_create_link_with_custom_code() {
    let (server, ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": "promo"
        }))
        .await;

    assert_eq!(response.status_code(), 201);

    let link: LinkResponse = response.json();
    assert_eq!(link.short_url, "promo");
    assert_eq!(link.original_url, "https://example.com");
    assert!(link.is_active);
    assert!(link.deleted_at.is_none());

    assert!(ctx.links.get("promo").is_some());
}

#[tokio::test]
async fn test_create_link_generates_code() {
    let (server, _ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "https://example.com/page"
        }))
        .await;

    assert_eq!(response.status_code(), 201);

    let link: LinkResponse = response.json();
    assert_eq!(link.short_url.len(), 6);
    assert!(link.short_url.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(link.original_url, "https://example.com/page");
}

#[tokio::test]
async fn test_create_link_blank_code_is_generated() {
    let (server, _ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": ""
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let link: LinkResponse = response.json();
    assert_eq!(link.short_url.len(), 6);
}

#[tokio::test]
async fn test_create_link_record_shape() {
    let (server, _ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": "shape"
        }))
        .await;

    let body: Value = response.json();
    let object = body.as_object().unwrap();

    for field in [
        "id",
        "original_url",
        "short_url",
        "is_active",
        "created_at",
        "deleted_at",
    ] {
        assert!(object.contains_key(field), "missing field {field}");
    }
    assert_eq!(object.len(), 6);
}

#[tokio::test]
async fn test_create_link_invalid_key() {
    let (server, ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": "not-a-key",
            "original_url": "example.com",
            "short_url": "promo"
        }))
        .await;

    assert_eq!(response.status_code(), 401);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_api_key");
    assert!(ctx.links.get("promo").is_none());
}

#[tokio::test]
async fn test_create_link_expired_key() {
    let (server, ctx) = server();
    ctx.keys
        .seed("expired-key-000000001", Some(Utc::now() - Duration::hours(1)));

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": "expired-key-000000001",
            "original_url": "example.com"
        }))
        .await;

    assert_eq!(response.status_code(), 401);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "api_key_expired");
}

#[tokio::test]
async fn test_create_link_invalid_code_format() {
    let (server, _ctx) = server();
    let too_long = "x".repeat(21);

    for code in ["my code", "a/b", "ab", too_long.as_str()] {
        let response = server
            .post("/links")
            .json(&json!({
                "api_key": TEST_KEY,
                "original_url": "example.com",
                "short_url": code
            }))
            .await;

        assert_eq!(response.status_code(), 400, "code {code:?}");
    }
}

#[tokio::test]
async fn test_create_link_reserved_code() {
    let (server, _ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": "health"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_create_link_missing_fields() {
    let (server, _ctx) = server();

    let response = server.post("/links").json(&json!({})).await;

    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_create_link_duplicate_code_conflict() {
    let (server, _ctx) = server();

    let payload = json!({
        "api_key": TEST_KEY,
        "original_url": "example.com",
        "short_url": "taken"
    });

    let first = server.post("/links").json(&payload).await;
    assert_eq!(first.status_code(), 201);

    let second = server.post("/links").json(&payload).await;
    assert_eq!(second.status_code(), 409);

    let body: Value = second.json();
    assert_eq!(
        body["error"]["message"],
        "Short URL already exists. Please choose another one."
    );
}

#[tokio::test]
async fn test_deactivated_code_cannot_be_reused() {
    let (server, _ctx) = server();

    let payload = json!({
        "api_key": TEST_KEY,
        "original_url": "example.com",
        "short_url": "once"
    });

    server.post("/links").json(&payload).await;
    server
        .delete("/links/once")
        .json(&json!({ "api_key": TEST_KEY }))
        .await;

    let response = server.post("/links").json(&payload).await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_create_link_exhausted_after_five_collisions() {
    let links = Arc::new(CollidingLinkRepository::default());
    let keys = Arc::new(InMemoryApiKeyRepository::new());
    keys.seed(TEST_KEY, Some(Utc::now() + Duration::weeks(1)));

    let state = AppState::new(links.clone(), keys, Arc::new(NullAnalytics::new()), 6);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com"
        }))
        .await;

    assert_eq!(response.status_code(), 500);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "generation_exhausted");
    assert_eq!(links.attempts.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_list_links_only_active() {
    let (server, _ctx) = server();

    for code in ["first", "second", "third"] {
        server
            .post("/links")
            .json(&json!({
                "api_key": TEST_KEY,
                "original_url": format!("example.com/{code}"),
                "short_url": code
            }))
            .await;
    }

    server
        .delete("/links/second")
        .json(&json!({ "api_key": TEST_KEY }))
        .await;

    let response = server.get("/links").await;
    assert_eq!(response.status_code(), 200);

    let links: Vec<LinkResponse> = response.json();
    let mut codes: Vec<&str> = links.iter().map(|l| l.short_url.as_str()).collect();
    codes.sort();

    assert_eq!(codes, vec!["first", "third"]);
    assert!(links.iter().all(|l| l.is_active));
}

#[tokio::test]
async fn test_list_links_empty() {
    let (server, _ctx) = server();

    let response = server.get("/links").await;

    assert_eq!(response.status_code(), 200);
    let links: Vec<LinkResponse> = response.json();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_deactivate_link() {
    let (server, ctx) = server();

    server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": "bye"
        }))
        .await;

    let response = server
        .delete("/links/bye")
        .json(&json!({ "api_key": TEST_KEY }))
        .await;

    assert_eq!(response.status_code(), 200);

    let ack: DeactivateResponse = response.json();
    assert_eq!(ack.detail, "Short URL deactivated successfully.");

    let stored = ctx.links.get("bye").unwrap();
    assert!(!stored.is_active);
    assert!(stored.deleted_at.is_some());
}

#[tokio::test]
async fn test_deactivate_twice() {
    let (server, _ctx) = server();

    server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": "twice"
        }))
        .await;

    let first = server
        .delete("/links/twice")
        .json(&json!({ "api_key": TEST_KEY }))
        .await;
    assert_eq!(first.status_code(), 200);

    let second = server
        .delete("/links/twice")
        .json(&json!({ "api_key": TEST_KEY }))
        .await;
    assert_eq!(second.status_code(), 400);

    let body: Value = second.json();
    assert_eq!(body["error"]["message"], "Short URL is already deactivated.");
}

#[tokio::test]
async fn test_deactivate_missing_link() {
    let (server, _ctx) = server();

    let response = server
        .delete("/links/ghost")
        .json(&json!({ "api_key": TEST_KEY }))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_deactivate_invalid_key() {
    let (server, ctx) = server();

    server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": "keep"
        }))
        .await;

    let response = server
        .delete("/links/keep")
        .json(&json!({ "api_key": "wrong-key" }))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(ctx.links.get("keep").unwrap().is_active);
}

#[tokio::test]
async fn test_create_link_apikey_code_is_reserved() {
    let (server, ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com",
            "short_url": "apikey"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(ctx.links.get("apikey").is_none());
}

#[tokio::test]
async fn test_create_link_rejects_control_characters_in_url() {
    let (server, ctx) = server();

    let response = server
        .post("/links")
        .json(&json!({
            "api_key": TEST_KEY,
            "original_url": "example.com/a\nb",
            "short_url": "ctrl1"
        }))
        .await;

    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(ctx.links.get("ctrl1").is_none());

    let redirect = server.get("/ctrl1").await;
    assert_eq!(redirect.status_code(), 404);
}

#[tokio::test]
async fn test_create_link_malformed_json_uses_error_envelope() {
    let (server, _ctx) = server();

    let response = server
        .post("/links")
        .bytes("{\"api_key\":".into())
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["message"], "Invalid request body");
}

#[tokio::test]
async fn test_create_link_wrong_content_type_uses_error_envelope() {
    let (server, _ctx) = server();

    let response = server
        .post("/links")
        .text("api_key=x&original_url=example.com")
        .await;

    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_deactivate_malformed_json_uses_error_envelope() {
    let (server, _ctx) = server();

    let response = server
        .delete("/links/promo")
        .bytes("not json".into())
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}
