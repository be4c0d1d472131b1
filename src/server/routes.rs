//! Conversion route.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::convert::convert_bytes;
use crate::server::error::{ApiError, ValidationError};
use crate::server::AppState;

/// Multipart field carrying the PDF.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub brd_content: String,
}

/// `POST /convert`: extract a BRD description from an uploaded PDF.
pub async fn convert(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    // A body that is not multipart at all carries no file either.
    let Ok(mut multipart) = multipart else {
        return Err(ValidationError::NoFileUploaded.into());
    };

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // Plain form values named `file` are not uploads.
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        validate_file_name(&file_name)?;

        let bytes = field.bytes().await?;
        info!(file = %file_name, bytes = bytes.len(), "converting upload");

        let output = convert_bytes(&bytes, &state.config).await?;
        return Ok(Json(ConvertResponse {
            success: true,
            brd_content: output.brd,
        }));
    }

    Err(ValidationError::NoFileUploaded.into())
}

/// `GET /healthz`
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Extension check only; content is judged by the renderer.
pub(crate) fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NoFileSelected);
    }
    if !name.ends_with(".pdf") {
        return Err(ValidationError::NotPdf);
    }
    Ok(())
}
