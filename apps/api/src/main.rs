use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starwars_api::config::Config;
use starwars_api::services::seed::seed_if_empty;
use starwars_api::{build_cors_layer, build_router, AppState, AuthConfig, AuthService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starwars_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.common.environment,
        "Starting Star Wars API server on port {}",
        config.port
    );

    // Initialize database pool
    let database = config.database();
    tracing::info!("Connecting to database...");

    let connect_options = SqliteConnectOptions::from_str(&database.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Each connection to an in-memory database is a separate database
    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.connect_timeout_secs));
    if database.is_in_memory() {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(connect_options).await?;
    tracing::info!("Database connection established");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed successfully");

    // Create AuthService
    let auth_config = AuthConfig::with_expiry_string(config.jwt_secret.clone(), &config.jwt_access_expiry);
    let auth_service = AuthService::new(pool.clone(), auth_config);
    tracing::info!("AuthService initialized");

    match &config.admin_password {
        Some(password) => {
            if auth_service.ensure_admin_user(password).await? {
                tracing::info!("Bootstrap admin account created");
            }
        }
        None => tracing::info!("ADMIN_PASSWORD not set, skipping admin bootstrap"),
    }

    if config.seed_on_startup {
        if seed_if_empty(&pool).await? {
            tracing::info!("Sample catalog seeded");
        } else {
            tracing::debug!("Catalog already populated, skipping seed");
        }
    }

    let batch_config = config.batch_config();
    tracing::info!(
        delay_ms = batch_config.delay.as_millis() as u64,
        max_batch_size = batch_config.max_batch_size,
        "Loader batching configured"
    );

    // Build the router
    let app = build_router(
        AppState {
            pool,
            auth_service,
            batch_config,
        },
        build_cors_layer(&config),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphQL Playground available at http://{}:{}/graphql/playground",
        addr.ip(),
        addr.port()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
