//! Integration tests for authentication flow
//!
//! Tests the auth lifecycle over HTTP against the full router:
//! - Registration (valid, duplicate, invalid input)
//! - Login (valid credentials, invalid credentials, unknown user)
//! - `/auth/me` with and without a bearer token
//! - Bearer claims reaching GraphQL mutations

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{empty_pool, test_app};

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_graphql(query: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

async fn register(app: &Router, username: &str, email: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/auth/register",
            json!({ "username": username, "email": email, "password": "millennium" }),
        ),
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/auth/login",
            json!({ "username": username, "password": password }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_register_success() {
    let pool = empty_pool().await;
    let app = test_app(&pool);

    let (status, body) = register(&app, "lando", "lando@cloudcity.net").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "lando");
    assert_eq!(body["message"], "User registered successfully");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let pool = empty_pool().await;
    let app = test_app(&pool);

    let (status, _) = register(&app, "lando", "lando@cloudcity.net").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "lando", "other@cloudcity.net").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_ERROR");

    let (status, _) = register(&app, "calrissian", "LANDO@cloudcity.net").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let pool = empty_pool().await;
    let app = test_app(&pool);

    for body in [
        json!({ "username": "lo", "email": "lo@bespin.net", "password": "millennium" }),
        json!({ "username": "lobot", "email": "not-an-email", "password": "millennium" }),
        json!({ "username": "lobot", "email": "lobot@bespin.net", "password": "short" }),
        json!({ "username": "lobot", "email": "lobot@bespin.net", "password": "millennium", "role": "emperor" }),
    ] {
        let (status, response) = send(&app, post_json("/auth/register", body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(response["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_login_and_me() {
    let pool = empty_pool().await;
    let app = test_app(&pool);
    register(&app, "chewie", "chewie@kashyyyk.org").await;

    let (status, body) = login(&app, "chewie", "millennium").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["username"], "chewie");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["hashed_password"].is_null());
    let token = body["access_token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/auth/me")
        .header(header::AUTHORIZATION, format!("bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, me) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "chewie");
    assert_eq!(me["role"], "user");
    assert_eq!(me["id"], body["user"]["id"]);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let pool = empty_pool().await;
    let app = test_app(&pool);
    register(&app, "chewie", "chewie@kashyyyk.org").await;

    let (status, body) = login(&app, "chewie", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = login(&app, "nobody", "millennium").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let pool = empty_pool().await;
    let app = test_app(&pool);

    let request = Request::builder().uri("/auth/me").body(Body::empty()).unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/auth/me")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_graphql_mutation_with_bearer_token() {
    let pool = empty_pool().await;
    let app = test_app(&pool);
    register(&app, "wedge", "wedge@rogue.squadron").await;
    let (_, body) = login(&app, "wedge", "millennium").await;
    let token = body["access_token"].as_str().unwrap();

    let mutation = r#"mutation { createPlanet(input: { name: "Hoth", climate: "Frozen" }) { name } }"#;

    let (status, response) = send(&app, post_graphql(mutation, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");

    let (_, response) = send(&app, post_graphql(mutation, Some("garbage"))).await;
    assert_eq!(response["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");

    let (_, response) = send(&app, post_graphql(mutation, Some(token))).await;
    assert!(response["errors"].is_null(), "{response}");
    assert_eq!(response["data"]["createPlanet"]["name"], "Hoth");

    let (_, response) = send(&app, post_graphql("{ allPlanets { name } }", None)).await;
    assert_eq!(response["data"]["allPlanets"][0]["name"], "Hoth");
}
