//! Knowledge base uploads
//!
//! Only PDF documents are accepted. The type check runs before the session
//! is consulted or any byte leaves the machine.

use std::path::Path;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use tracing::{info, warn};

use super::client::{body_message, ApiClient, ApiError};

/// The only MIME type the knowledge base ingests
pub const PDF_MIME: &str = "application/pdf";

const UPLOAD_PATH: &str = "/add_to_knowledge_base";
const UPLOAD_FALLBACK_MESSAGE: &str = "Failed to upload file";

/// Guesses a MIME type from a file name's extension
pub fn mime_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn ensure_pdf(file_name: &str, mime: &str) -> Result<(), ApiError> {
    if mime.eq_ignore_ascii_case(PDF_MIME) {
        return Ok(());
    }
    Err(ApiError::UnsupportedFileType {
        file: file_name.to_string(),
        mime: mime.to_string(),
    })
}

impl ApiClient {
    /// Uploads a PDF from disk into the knowledge base
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsupportedFileType`] for anything but a PDF,
    /// before the file is read or the backend contacted.
    pub async fn upload_knowledge(&self, path: &Path) -> Result<(), ApiError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::InvalidInput(format!("{} is not a file", path.display())))?;

        let mime = mime_for(&file_name);
        ensure_pdf(&file_name, &mime)?;

        let bytes = tokio::fs::read(path).await?;
        self.upload_knowledge_bytes(&file_name, &mime, bytes).await
    }

    /// Uploads in-memory PDF content into the knowledge base
    ///
    /// Sent as `multipart/form-data` with a single `file` part.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upload`] with the server's message, or
    /// `"Failed to upload file"` when the error body is not JSON.
    pub async fn upload_knowledge_bytes(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        ensure_pdf(file_name, mime)?;

        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        // The multipart body supplies its own content type with the boundary.
        let mut headers = self.auth_headers().await?;
        headers.remove(CONTENT_TYPE);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self
            .http
            .post(self.url(UPLOAD_PATH))
            .headers(headers)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message =
                body_message(&body).unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string());
            warn!(file = %file_name, status = status.as_u16(), message = %message, "Upload rejected");
            return Err(ApiError::Upload {
                status: status.as_u16(),
                message,
            });
        }

        info!(file = %file_name, bytes = size, "Uploaded document to knowledge base");
        Ok(())
    }
}
