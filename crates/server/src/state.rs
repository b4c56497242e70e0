//! Shared application state for axum handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
}

impl AppState {
    /// Build state from loaded configuration and a connected pool.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }
}
