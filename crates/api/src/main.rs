use std::net::SocketAddr;
use std::sync::Arc;

use fictsu_cloud::ai::{OpenAiClient, OpenAiSettings};
use fictsu_cloud::identity::{GoogleProvider, GoogleSettings};
use fictsu_cloud::storage::{S3ObjectStore, S3Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fictsu_api::config::ServerConfig;
use fictsu_api::router::build_app_router;
use fictsu_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fictsu_api=debug,fictsu_cloud=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = fictsu_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fictsu_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    fictsu_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External services ---
    let storage = S3ObjectStore::new(S3Settings {
        bucket: config.storage.bucket.clone(),
        region: config.storage.region.clone(),
        endpoint: Some(config.storage.endpoint.clone()),
        public_base_url: config.storage.public_base_url.clone(),
        access_key: config.storage.access_key.clone(),
    })
    .await;
    tracing::info!(bucket = %config.storage.bucket, "Object storage client created");

    let ai = OpenAiClient::new(OpenAiSettings {
        api_key: config.ai.api_key.clone(),
        organization: config.ai.organization.clone(),
        project: config.ai.project.clone(),
        base_url: config.ai.base_url.clone(),
    })
    .expect("Failed to build AI client");

    let identity = GoogleProvider::new(GoogleSettings {
        client_id: config.oauth.client_id.clone(),
        client_secret: config.oauth.client_secret.clone(),
        callback_url: config.oauth.callback_url.clone(),
    })
    .expect("Failed to build identity provider client");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: Arc::new(storage),
        ai: Arc::new(ai),
        identity: Arc::new(identity),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
