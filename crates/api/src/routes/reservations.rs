//! Route definitions for reservations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

/// Reservation routes mounted at `/api/reservations`.
///
/// ```text
/// POST /{service_id}    -> create_reservation
/// GET  /code/{code}     -> get_reservation_by_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{service_id}", post(reservations::create_reservation))
        .route("/code/{code}", get(reservations::get_reservation_by_code))
}
