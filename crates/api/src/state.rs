use std::sync::Arc;

use movitur_db::client::PgRegistry;
use movitur_db::{DbError, PgClient};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Process-scoped database client registry.
    pub db: Arc<PgRegistry>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// The database client, built on first use.
    pub fn db_client(&self) -> Result<Arc<PgClient>, DbError> {
        self.db.get_instance()
    }
}
