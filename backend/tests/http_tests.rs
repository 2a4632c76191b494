//! HTTP transport tests: the real router driven in-process

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use bookshelf::build_app;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn graphql_post(uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let app = build_app(test_state().await);
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readyz_checks_database() {
    let app = build_app(test_state().await);
    let response = app
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body, json!({ "ready": true, "database": true }));
}

#[tokio::test]
async fn test_graphql_get_without_html_is_rejected() {
    let app = build_app(test_state().await);
    let response = app
        .oneshot(Request::get("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_bearer_token_authenticates_me() {
    let app = build_app(test_state().await);

    let response = app
        .clone()
        .oneshot(graphql_post(
            "/graphql",
            None,
            json!({
                "query": ADD_USER,
                "variables": { "username": "alice", "email": "a@x.com", "password": "secret1" }
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let token = body["data"]["addUser"]["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(graphql_post("/graphql", Some(&token), json!({ "query": ME })))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["me"]["username"], "alice");

    // Same token via query parameter
    let response = app
        .oneshot(graphql_post(
            &format!("/graphql?token={}", token),
            None,
            json!({ "query": ME }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["me"]["username"], "alice");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_anonymous() {
    let app = build_app(test_state().await);

    for bearer in [None, Some("garbage.token.value")] {
        let response = app
            .clone()
            .oneshot(graphql_post("/graphql", bearer, json!({ "query": ME })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    }
}
