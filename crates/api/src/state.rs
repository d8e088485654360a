use std::sync::Arc;

use fictsu_cloud::ai::AiClient;
use fictsu_cloud::identity::IdentityProvider;
use fictsu_cloud::storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fictsu_db::DbPool,
    /// Server configuration, read-only after startup.
    pub config: Arc<ServerConfig>,
    /// Object storage for covers and chapter images.
    pub storage: Arc<dyn ObjectStore>,
    /// Text and image generation.
    pub ai: Arc<dyn AiClient>,
    /// OAuth identity provider used for login.
    pub identity: Arc<dyn IdentityProvider>,
}
