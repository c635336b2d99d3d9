// Document intake: turns uploaded PDF resumes and job descriptions into plain
// text for the analysis endpoints.
pub mod handlers;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file is empty")]
    Empty,

    #[error("file is not a PDF")]
    NotPdf,

    #[error("could not read PDF: {0}")]
    Unreadable(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

/// Extracts the text layer of a PDF. Parsing is CPU-bound and the parser can
/// panic on malformed input, so it runs on the blocking pool and a panic is
/// reported as `Unreadable`.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, ExtractError> {
    if data.is_empty() {
        return Err(ExtractError::Empty);
    }
    if !data.starts_with(PDF_MAGIC) {
        return Err(ExtractError::NotPdf);
    }

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| ExtractError::Unreadable(format!("parser crashed: {e}")))?
        .map_err(|e| ExtractError::Unreadable(e.to_string()))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ExtractError::NoText);
    }
    debug!("Extracted {} characters from PDF", text.chars().count());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let err = extract_pdf_text(Bytes::new()).await.unwrap_err();
        assert!(matches!(err, ExtractError::Empty));
    }

    #[tokio::test]
    async fn test_non_pdf_rejected() {
        let err = extract_pdf_text(Bytes::from_static(b"Jane Doe\nRust engineer"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotPdf));
    }

    #[tokio::test]
    async fn test_truncated_pdf_is_unreadable() {
        let err = extract_pdf_text(Bytes::from_static(b"%PDF-1.4\n%garbage"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unreadable(_)));
    }
}
