//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use melos_core::{ErrorBody, MelosError};
use serde::Serialize;

/// Application error type for Axum.
///
/// Errors serialize as `{"error": "<code>", "message": "..."}`; the gate
/// additionally emits bare `{"error": "<code>"}` bodies of its own.
#[derive(Debug)]
pub struct AppError(pub MelosError);

impl From<MelosError> for AppError {
    fn from(err: MelosError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(ErrorBody::from_error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

/// Helper to create a no content (204) response.
#[must_use]
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Terminal gate rejection: status plus a bare `{"error": "<code>"}` body.
///
/// Deliberately carries no message so credential material and store
/// internals never echo back to the caller.
pub fn rejection(status: StatusCode, code: &str) -> Response {
    (status, Json(ErrorBody::code_only(code))).into_response()
}
