//! Shared response envelope for API handlers.
//!
//! Successful responses use `{ "success": true, "data": ..., "trackingUrl": ... }`;
//! failures are rendered by [`crate::error::AppError`] as
//! `{ "success": false, "error": ..., "code": ... }`.

use serde::Serialize;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(reservation).with_tracking_url(url)))
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            tracking_url: None,
        }
    }

    pub fn with_tracking_url(mut self, url: String) -> Self {
        self.tracking_url = Some(url);
        self
    }
}
