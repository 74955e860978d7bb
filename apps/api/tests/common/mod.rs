//! Common test utilities for API integration tests
//!
//! Every test gets its own private in-memory SQLite database migrated with
//! the embedded migrations, optionally filled with the sample catalog.

#![allow(dead_code)]

use std::str::FromStr;

use axum::Router;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

use starwars_api::models::{Claims, EntityId};
use starwars_api::services::auth::Registration;
use starwars_api::services::seed::seed_if_empty;
use starwars_api::{
    attach_loaders, build_router, build_schema, AppState, AuthConfig, AuthService, BatchConfig,
    StarWarsSchema,
};

/// JWT secret for testing (must be at least 32 characters)
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests-minimum-32-chars";

/// Migrated database without any catalog rows
pub async fn empty_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // One connection that never expires: each new connection would be a new database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// Migrated database holding the sample catalog
pub async fn seeded_pool() -> SqlitePool {
    let pool = empty_pool().await;
    assert!(seed_if_empty(&pool).await.unwrap());
    pool
}

/// Look up an entity id by its unique name
pub async fn id_of(pool: &SqlitePool, table: &str, name: &str) -> EntityId {
    let sql = format!("SELECT id FROM {table} WHERE name = ?");
    sqlx::query_scalar(&sql)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("{name} not found in {table}: {e}"))
}

pub fn test_auth_service(pool: &SqlitePool) -> AuthService {
    AuthService::new(pool.clone(), AuthConfig::new(TEST_JWT_SECRET.to_string()))
}

/// Register a user and return claims as a verified token would carry them
pub async fn test_claims(pool: &SqlitePool) -> Claims {
    let auth = test_auth_service(pool);
    let user = auth
        .register(Registration {
            username: "rebel".to_string(),
            email: "rebel@alliance.org".to_string(),
            password: "use-the-force".to_string(),
            role: None,
        })
        .await
        .unwrap();

    let token = auth.issue_access_token(&user).unwrap();
    auth.verify_access_token(&token).unwrap()
}

/// Full application router over the given pool
pub fn test_app(pool: &SqlitePool) -> Router {
    build_router(
        AppState {
            pool: pool.clone(),
            auth_service: test_auth_service(pool),
            batch_config: BatchConfig::default(),
        },
        CorsLayer::permissive(),
    )
}

/// Execute one GraphQL document the way the HTTP handler does
pub async fn execute(
    schema: &StarWarsSchema,
    pool: &SqlitePool,
    query: &str,
    claims: Option<Claims>,
) -> Value {
    let mut request = async_graphql::Request::new(query);
    if let Some(claims) = claims {
        request = request.data(claims);
    }
    let request = attach_loaders(request, pool, BatchConfig::default());

    serde_json::to_value(schema.execute(request).await).unwrap()
}

pub fn schema(pool: &SqlitePool) -> StarWarsSchema {
    build_schema(pool.clone())
}

/// `extensions.code` of the first error in a GraphQL response
pub fn first_error_code(response: &Value) -> &str {
    response["errors"][0]["extensions"]["code"]
        .as_str()
        .unwrap_or_else(|| panic!("expected an error with a code, got {response}"))
}

/// Names of a list of objects, in order
pub fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap_or_else(|| panic!("expected a list, got {list}"))
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect()
}
