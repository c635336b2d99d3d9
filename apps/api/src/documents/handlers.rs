//! Axum route handlers for the Documents API.

use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::info;

use crate::documents::extract_pdf_text;
use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub filename: Option<String>,
    pub text: String,
    pub characters: usize,
}

/// POST /api/v1/documents/extract
///
/// Multipart upload with a `file` field holding a PDF. Returns its text so the
/// client can feed it to the analysis endpoints.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let text = extract_pdf_text(data)
            .await
            .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
        let characters = text.chars().count();
        info!("Extracted {characters} characters from {filename:?}");

        return Ok(Json(ExtractResponse {
            filename,
            text,
            characters,
        }));
    }

    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}
