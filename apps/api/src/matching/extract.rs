//! Document text extraction — turns an uploaded resume into plain `resume_text`.

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document type: {0}")]
    Unsupported(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Document is not valid UTF-8 text")]
    NotUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Picks the kind from the declared content type, falling back to the
    /// file extension when the client sends a generic type.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Result<Self, ExtractError> {
        let content_type = content_type.unwrap_or("application/octet-stream");
        match content_type {
            "application/pdf" => return Ok(DocumentKind::Pdf),
            t if t.starts_with("text/plain") => return Ok(DocumentKind::PlainText),
            "application/octet-stream" => {}
            other => return Err(ExtractError::Unsupported(other.to_string())),
        }

        let extension = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase());
        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("txt") => Ok(DocumentKind::PlainText),
            _ => Err(ExtractError::Unsupported(
                file_name.unwrap_or("unnamed upload").to_string(),
            )),
        }
    }
}

/// Extracts and normalises the text of a document.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    let raw = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        DocumentKind::PlainText => {
            String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::NotUtf8)?
        }
    };

    let text = collapse_whitespace(&raw);
    info!("Extracted text from {kind:?} document. Length: {}", text.len());
    Ok(text)
}

/// Collapses every whitespace run (newlines included) to one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
