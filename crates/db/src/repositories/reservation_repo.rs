//! Repository for the `reservations` table.

use sqlx::PgPool;

use crate::models::reservation::{CreateReservation, Reservation, STATUS_PENDING};

/// Column list for `reservations` queries.
const COLUMNS: &str = "\
    id, code, service_id, customer_name, customer_email, customer_phone, \
    passengers, travel_date, departure_time, status, details, \
    created_at, updated_at";

/// Unique constraint guarding reservation codes.
pub const CODE_CONSTRAINT: &str = "uq_reservations_code";

/// Provides data access for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a new pending reservation.
    ///
    /// A duplicate code fails with a unique violation on
    /// [`CODE_CONSTRAINT`]; see [`is_code_conflict`].
    pub async fn create(
        pool: &PgPool,
        dto: &CreateReservation,
    ) -> Result<Reservation, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservations \
                 (code, service_id, customer_name, customer_email, customer_phone, \
                  passengers, travel_date, departure_time, status, details) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(&dto.code)
            .bind(dto.service_id)
            .bind(&dto.customer_name)
            .bind(&dto.customer_email)
            .bind(&dto.customer_phone)
            .bind(dto.passengers)
            .bind(dto.travel_date)
            .bind(dto.departure_time)
            .bind(STATUS_PENDING)
            .bind(&dto.details)
            .fetch_one(pool)
            .await
    }

    /// Look a reservation up by its public code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE code = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}

/// Whether `err` is a unique violation on the reservation code.
pub fn is_code_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(CODE_CONSTRAINT)
        }
        _ => false,
    }
}
