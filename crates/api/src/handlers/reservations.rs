//! Handlers for reservation creation and lookup.
//!
//! The booking site posts whatever fields its form collected. The handler
//! reads the ones it understands, keeps the full payload in `details`, and
//! stamps the reservation with a generated code.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use movitur_core::error::CoreError;
use movitur_core::reservation_code::{self, ReservationCode};
use movitur_core::time;
use movitur_core::types::{DbId, Timestamp};
use movitur_db::models::reservation::CreateReservation;
use movitur_db::repositories::reservation_repo::is_code_conflict;
use movitur_db::repositories::{ReservationRepo, ServiceRepo};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Attempts at inserting with a fresh code before giving up on collisions.
const MAX_CODE_ATTEMPTS: u32 = 3;

/// Fields of the submitted payload the service understands.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub customer_name: String,
    #[serde(default, deserialize_with = "trimmed_non_blank")]
    #[validate(email(message = "must be a valid email address"))]
    pub customer_email: Option<String>,
    #[serde(default, deserialize_with = "trimmed_non_blank")]
    #[validate(length(min = 6, max = 32, message = "must be 6-32 characters"))]
    pub customer_phone: Option<String>,
    #[validate(range(min = 1, max = 50, message = "must be between 1 and 50"))]
    pub passengers: Option<i32>,
    /// `YYYY-MM-DD`.
    pub travel_date: Option<String>,
    /// Clock string, date, or epoch milliseconds.
    pub departure_time: Option<Value>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/reservations/{service_id}
///
/// Create a pending reservation for an active service. Returns 201 with the
/// reservation and its tracking URL.
pub async fn create_reservation(
    State(state): State<AppState>,
    service_id: Result<Path<DbId>, PathRejection>,
    fields: Result<Json<Map<String, Value>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(service_id) = service_id?;
    let Json(fields) = fields?;
    let mut dto = prepare_reservation(service_id, fields)?;

    let client = state.db_client()?;
    let pool = client.pool();

    ServiceRepo::find_active_by_id(pool, service_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Service", service_id))?;

    let mut attempt = 1;
    let reservation = loop {
        match ReservationRepo::create(pool, &dto).await {
            Ok(reservation) => break reservation,
            Err(err) if is_code_conflict(&err) && attempt < MAX_CODE_ATTEMPTS => {
                tracing::warn!(code = %dto.code, attempt, "Reservation code collision, regenerating");
                dto.code = reservation_code::generate().into_string();
                attempt += 1;
            }
            Err(err) => return Err(AppError::Database(err)),
        }
    };

    tracing::info!(
        reservation_id = reservation.id,
        code = %reservation.code,
        service_id,
        "Reservation created",
    );

    let tracking_url = state.config.tracking_url(&reservation.code);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(reservation).with_tracking_url(tracking_url)),
    ))
}

/// GET /api/reservations/code/{code}
///
/// Look a reservation up by its public code (case-insensitive).
pub async fn get_reservation_by_code(
    State(state): State<AppState>,
    Path(raw_code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let code = ReservationCode::parse(&raw_code).ok_or_else(|| {
        CoreError::Validation(format!("Malformed reservation code: {raw_code}"))
    })?;

    let client = state.db_client()?;
    let reservation = ReservationRepo::find_by_code(client.pool(), code.as_str())
        .await?
        .ok_or_else(|| CoreError::not_found("Reservation", &code))?;

    Ok(Json(ApiResponse::ok(reservation)))
}

// ---------------------------------------------------------------------------
// Payload preparation
// ---------------------------------------------------------------------------

/// Validate the submitted fields and build the insert DTO with a fresh code.
pub fn prepare_reservation(
    service_id: DbId,
    fields: Map<String, Value>,
) -> Result<CreateReservation, CoreError> {
    let details = Value::Object(fields);
    let request: ReservationRequest = serde_json::from_value(details.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid reservation payload: {e}")))?;
    request.validate()?;

    let customer_name = request.customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(CoreError::Validation(
            "customerName: must not be blank".into(),
        ));
    }

    if request.customer_email.is_none() && request.customer_phone.is_none() {
        return Err(CoreError::Validation(
            "customerEmail or customerPhone is required".into(),
        ));
    }

    let travel_date = request
        .travel_date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                CoreError::Validation(format!("travelDate: expected YYYY-MM-DD, got {s}"))
            })
        })
        .transpose()?;

    Ok(CreateReservation {
        code: reservation_code::generate().into_string(),
        service_id,
        customer_name,
        customer_email: request.customer_email,
        customer_phone: request.customer_phone,
        passengers: request.passengers.unwrap_or(1),
        travel_date,
        departure_time: departure_time(request.departure_time.as_ref())?,
        details,
    })
}

/// Forms send empty strings for untouched inputs; those count as absent.
fn trimmed_non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Normalise the departure time. Strings and epoch milliseconds are
/// accepted as-is by the lenient parser; other JSON types are rejected.
fn departure_time(value: Option<&Value>) -> Result<Option<Timestamp>, CoreError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(time::parse(s.as_str()).as_datetime())),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|millis| Some(time::parse(millis).as_datetime()))
            .ok_or_else(|| {
                CoreError::Validation("departureTime: expected whole milliseconds".into())
            }),
        Some(_) => Err(CoreError::Validation(
            "departureTime: expected a string or a number".into(),
        )),
    }
}
