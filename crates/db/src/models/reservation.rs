//! Reservation models and DTOs.

use chrono::NaiveDate;
use movitur_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Status assigned to newly created reservations.
pub const STATUS_PENDING: &str = "pending";

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `reservations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: DbId,
    pub code: String,
    pub service_id: DbId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub passengers: i32,
    pub travel_date: Option<NaiveDate>,
    pub departure_time: Option<Timestamp>,
    pub status: String,
    /// The submitted payload, verbatim.
    pub details: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Everything needed to insert a reservation. Built by the API layer after
/// validation; `code` comes from the reservation code generator.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub code: String,
    pub service_id: DbId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub passengers: i32,
    pub travel_date: Option<NaiveDate>,
    pub departure_time: Option<Timestamp>,
    pub details: serde_json::Value,
}
