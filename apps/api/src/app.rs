//! HTTP application assembly
//!
//! Builds the axum router shared by the binary and the integration tests:
//! - `GET /` welcome document
//! - `POST /graphql` and `GET /graphql/playground`
//! - `/health` and `/auth` REST routes

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    http::{header, Method},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::graphql::loaders::{attach_loaders, BatchConfig};
use crate::graphql::{build_schema, StarWarsSchema};
use crate::middleware::MaybeAuthUser;
use crate::routes::{auth_router, health_router, AuthState, HealthState};
use crate::services::AuthService;

/// Everything the router needs from start-up
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: AuthService,
    pub batch_config: BatchConfig,
}

/// Pool and loader settings used to give each GraphQL request its own loaders
#[derive(Clone)]
struct GraphQLContext {
    pool: SqlitePool,
    batch_config: BatchConfig,
}

/// Build the application router
pub fn build_router(state: AppState, cors_layer: CorsLayer) -> Router {
    let schema = build_schema(state.pool.clone());
    let graphql_context = GraphQLContext {
        pool: state.pool.clone(),
        batch_config: state.batch_config,
    };

    Router::new()
        .route("/", get(root))
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        // Nested health routes: /health, /health/live
        .nest("/health", health_router(HealthState::new(state.pool.clone())))
        // Auth REST routes: /auth/register, /auth/login, /auth/me
        .nest("/auth", auth_router(AuthState::new(state.auth_service.clone())))
        .layer(Extension(schema))
        .layer(Extension(graphql_context))
        .layer(Extension(state.auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
}

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                return CorsLayer::new();
            }

            tracing::info!(
                "CORS configured with {} allowed origin(s): {:?}",
                allowed_origins.len(),
                origins
            );
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

/// GraphQL handler that executes queries against the schema
///
/// Verified claims, if the caller presented a valid bearer token, are
/// injected into the request data for the mutation guards. Every request
/// also gets a fresh loader registry, so no cached rows outlive it.
async fn graphql_handler(
    Extension(schema): Extension<StarWarsSchema>,
    Extension(context): Extension<GraphQLContext>,
    auth: MaybeAuthUser,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    if let Some(claims) = auth.claims {
        tracing::debug!(username = %claims.sub, "GraphQL request authenticated");
        request = request.data(claims);
    }

    let request = attach_loaders(request, &context.pool, context.batch_config);
    schema.execute(request).await.into()
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Star Wars API",
        "graphql": "/graphql",
        "playground": "/graphql/playground",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
