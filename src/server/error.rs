//! Boundary error type: what a `/convert` caller can see.
//!
//! Validation problems are the caller's to fix and map to 400 with a fixed
//! message. Anything that fails after the upload was accepted is a
//! [`BrdError`] and maps to 500 carrying its display text.

use crate::error::BrdError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;
use tracing::{debug, warn};

/// Rejections that happen before any PDF processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("No file selected")]
    NoFileSelected,
    #[error("Only PDF files are supported")]
    NotPdf,
}

/// Every failure a `/convert` request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The multipart body could not be read (too large, truncated, malformed).
    #[error("{message}")]
    Upload { status: StatusCode, message: String },

    #[error(transparent)]
    Processing(#[from] BrdError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload { status, .. } => *status,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            warn!(%status, error = %message, "conversion failed");
        } else {
            debug!(%status, error = %message, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
