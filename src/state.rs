//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::{config::Config, db::DbPool};

/// State shared across all routes via Axum's `State` extractor.
///
/// Cloning is cheap: the pool is internally reference-counted and the
/// configuration sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: DbPool,

    /// Immutable application configuration (secrets, token lifetimes)
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
