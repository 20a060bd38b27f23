pub mod health;
pub mod reservations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /reservations/{service_id}          create (POST)
/// /reservations/code/{code}           look up by code (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/reservations", reservations::router())
}
