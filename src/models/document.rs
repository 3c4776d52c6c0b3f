use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Immutable handle to an uploaded file's content and metadata.
/// Replaced wholesale when the user picks a new file, cleared on reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReference {
    /// File content, base64-encoded for inline transport to the AI service.
    pub payload: String,
    pub mime_type: String,
    pub display_name: String,
}

impl DocumentReference {
    /// Builds a reference from raw uploaded bytes. Only `.pdf` and `.docx`
    /// uploads are accepted; everything else is rejected at this boundary
    /// and never reaches the session state machine.
    pub fn from_bytes(display_name: &str, bytes: Bytes) -> Result<Self> {
        let lower = display_name.to_lowercase();
        if !lower.ends_with(".pdf") && !lower.ends_with(".docx") {
            return Err(Error::InvalidFileType(format!(
                "'{}' is not a .pdf or .docx file",
                display_name
            )));
        }

        Ok(Self {
            payload: BASE64.encode(&bytes),
            mime_type: mime_type_for(display_name).to_string(),
            display_name: display_name.to_string(),
        })
    }
}

/// Extension to MIME type lookup. Total: unknown extensions fall back to
/// `text/plain`, matching what the AI service tolerates for inline data.
pub fn mime_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        PDF_MIME
    } else if lower.ends_with(".docx") {
        DOCX_MIME
    } else {
        "text/plain"
    }
}
