// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain-error to HTTP response mapping.
//!
//! Every error body has the shape `{"message": ..., "status_code": ...}`
//! so clients handle one format everywhere.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use carthub_core::CarthubError;

/// Handler result type; errors render as JSON.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper giving [`CarthubError`] an HTTP rendering.
#[derive(Debug)]
pub struct ApiError(pub CarthubError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    status_code: u16,
}

impl From<CarthubError> for ApiError {
    fn from(err: CarthubError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            CarthubError::Validation(_) => StatusCode::BAD_REQUEST,
            CarthubError::NotFound { .. } => StatusCode::NOT_FOUND,
            CarthubError::Conflict(_) => StatusCode::CONFLICT,
            CarthubError::Config(_) | CarthubError::Storage { .. } | CarthubError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            message: self.0.to_string(),
            status_code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
