//! HTTP client for submitting reservations from the booking site.
//!
//! Wraps `POST /api/reservations/{service_id}` using [`reqwest`] and keeps a
//! small [`SubmissionState`] that a UI can poll to show a spinner or the
//! last error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Shown when the server gives no usable error message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error al crear la reserva";

/// Observable state of the current or last submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    /// At least one submission is in flight.
    pub loading: bool,
    /// Message of the last failed submission. Cleared when a new one starts.
    pub error: Option<String>,
}

/// State shared by a client and its clones.
#[derive(Debug, Default)]
struct Tracker {
    in_flight: usize,
    error: Option<String>,
}

/// A reservation the server accepted.
#[derive(Debug, Clone)]
pub struct ReservationCreated {
    /// The stored reservation as returned by the server.
    pub data: serde_json::Value,
    /// Public link where the customer can follow the reservation.
    pub tracking_url: Option<String>,
}

/// Errors from submitting a reservation.
///
/// Every variant carries a message fit to show to the customer; see
/// [`SubmitError::message`].
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The server answered but refused the reservation.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never got an answer (network, DNS, TLS, etc.).
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server claimed success but the body was not a reservation.
    #[error("{message}")]
    InvalidResponse { status: u16, message: String },
}

impl SubmitError {
    /// Human-readable message for the customer.
    pub fn message(&self) -> &str {
        match self {
            SubmitError::Rejected { message, .. }
            | SubmitError::Transport { message, .. }
            | SubmitError::InvalidResponse { message, .. } => message,
        }
    }

    fn transport(source: reqwest::Error) -> Self {
        SubmitError::Transport {
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            source,
        }
    }
}

/// Response envelope shared by success and failure bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    success: bool,
    data: Option<serde_json::Value>,
    tracking_url: Option<String>,
    error: Option<String>,
}

/// Client for the reservation API of a single server.
///
/// Clones share the same [`SubmissionState`]; `loading` stays set until
/// every overlapping submission has finished.
#[derive(Debug, Clone)]
pub struct ReservationClient {
    client: reqwest::Client,
    base_url: String,
    tracker: Arc<Mutex<Tracker>>,
}

impl ReservationClient {
    /// Create a client for the server at `base_url`, e.g. `http://host:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            tracker: Arc::new(Mutex::new(Tracker::default())),
        }
    }

    /// Snapshot of the submission state.
    pub fn state(&self) -> SubmissionState {
        let tracker = lock(&self.tracker);
        SubmissionState {
            loading: tracker.in_flight > 0,
            error: tracker.error.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.tracker).in_flight > 0
    }

    /// Submit a reservation for `service_id`.
    ///
    /// `loading` stays set until this future completes or is dropped. On
    /// failure the error message is also recorded in the state.
    pub async fn create_reservation<T>(
        &self,
        service_id: i64,
        fields: &T,
    ) -> Result<ReservationCreated, SubmitError>
    where
        T: Serialize + ?Sized,
    {
        let _guard = LoadingGuard::start(&self.tracker);

        let result = self.submit(service_id, fields).await;
        if let Err(err) = &result {
            tracing::warn!(service_id, error = %err, "Reservation submission failed");
            lock(&self.tracker).error = Some(err.message().to_string());
        }
        result
    }

    // ---- private helpers ----

    async fn submit<T>(&self, service_id: i64, fields: &T) -> Result<ReservationCreated, SubmitError>
    where
        T: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(format!("{}/api/reservations/{service_id}", self.base_url))
            .json(fields)
            .send()
            .await
            .map_err(SubmitError::transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(SubmitError::transport)?;
        let envelope = serde_json::from_slice::<Envelope>(&body).ok();

        match envelope {
            Some(Envelope {
                success: true,
                data: Some(data),
                tracking_url,
                ..
            }) if status.is_success() => Ok(ReservationCreated { data, tracking_url }),
            Some(envelope) if !envelope.success || !status.is_success() => {
                Err(SubmitError::Rejected {
                    status: status.as_u16(),
                    message: server_message(envelope.error),
                })
            }
            None if !status.is_success() => Err(SubmitError::Rejected {
                status: status.as_u16(),
                message: DEFAULT_ERROR_MESSAGE.to_string(),
            }),
            _ => Err(SubmitError::InvalidResponse {
                status: status.as_u16(),
                message: DEFAULT_ERROR_MESSAGE.to_string(),
            }),
        }
    }
}

fn server_message(error: Option<String>) -> String {
    error
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}

fn lock(tracker: &Mutex<Tracker>) -> MutexGuard<'_, Tracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Counts a submission as in flight until dropped.
struct LoadingGuard<'a> {
    tracker: &'a Mutex<Tracker>,
}

impl<'a> LoadingGuard<'a> {
    fn start(tracker: &'a Mutex<Tracker>) -> Self {
        let mut current = lock(tracker);
        current.in_flight += 1;
        current.error = None;
        Self { tracker }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut current = lock(self.tracker);
        current.in_flight = current.in_flight.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_server_message_falls_back_to_default() {
        assert_eq!(server_message(None), DEFAULT_ERROR_MESSAGE);
        assert_eq!(server_message(Some("  ".into())), DEFAULT_ERROR_MESSAGE);
        assert_eq!(server_message(Some("Sin plazas".into())), "Sin plazas");
    }

    #[test]
    fn guard_counts_in_flight_and_clears_error() {
        let tracker = Mutex::new(Tracker {
            in_flight: 0,
            error: Some("previous".into()),
        });

        {
            let _guard = LoadingGuard::start(&tracker);
            assert_eq!(lock(&tracker).in_flight, 1);
            assert_eq!(lock(&tracker).error, None);
        }

        assert_eq!(lock(&tracker).in_flight, 0);
    }

    #[test]
    fn overlapping_guards_keep_loading_until_the_last_drops() {
        let client = ReservationClient::new("http://localhost:3000");

        let first = LoadingGuard::start(&client.tracker);
        let second = LoadingGuard::start(&client.tracker);
        drop(first);
        assert!(client.is_loading());

        drop(second);
        assert!(!client.is_loading());
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = ReservationClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.state(), SubmissionState::default());
    }
}
