//! Two-phase file upload
//!
//! 1. Ask the service for a signed destination for the file name.
//! 2. Validate and read the file, then PUT its bytes to that destination.
//!
//! The request id returned in step 1 identifies the analysis job.

use bridge_traits::storage::FileSystemAccess;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{DetectionError, Result};
use crate::media::{self, MediaFile};
use crate::transport::{paths, ApiTransport};
use crate::types::UploadResult;

/// Destination issued by the service for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUpload {
    pub request_id: String,
    pub media_id: String,
    pub signed_url: String,
}

impl SignedUpload {
    /// Parse `{requestId, mediaId, response: {signedUrl}}`; every field must be non-empty.
    pub fn from_response(body: &Value) -> Result<Self> {
        let text = |value: Option<&Value>| {
            value
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let request_id = text(body.get("requestId"));
        let media_id = text(body.get("mediaId"));
        let signed_url = text(body.get("response").and_then(|r| r.get("signedUrl")));

        match (request_id, media_id, signed_url) {
            (Some(request_id), Some(media_id), Some(signed_url)) => Ok(Self {
                request_id,
                media_id,
                signed_url,
            }),
            _ => Err(DetectionError::server_error(
                "Invalid response from API - missing requestId, mediaId, or signedUrl",
            )),
        }
    }
}

/// Upload orchestrator.
pub struct Uploader {
    transport: Arc<ApiTransport>,
    file_system: Arc<dyn FileSystemAccess>,
}

impl Uploader {
    pub fn new(transport: Arc<ApiTransport>, file_system: Arc<dyn FileSystemAccess>) -> Self {
        Self {
            transport,
            file_system,
        }
    }

    /// Upload a local file for analysis.
    ///
    /// # Errors
    ///
    /// - `invalid_file` for an empty path, a missing, unsupported or unreadable file
    /// - `file_too_large` when the file exceeds its category's ceiling
    /// - `server_error` when the signed destination is incomplete
    /// - `upload_failed` when the PUT fails
    /// - any error of the signed-URL request itself
    #[instrument(skip(self), fields(file = %media::file_name_of(file_path)))]
    pub async fn upload(&self, file_path: &str) -> Result<UploadResult> {
        if file_path.is_empty() {
            return Err(DetectionError::invalid_file(
                "file_path is required for upload",
            ));
        }

        let file_name = media::file_name_of(file_path);
        let signed = self.request_signed_url(&file_name).await?;
        debug!(request_id = %signed.request_id, "Signed destination issued");

        let media = media::inspect(self.file_system.as_ref(), file_path).await?;
        self.put_to_signed_url(&signed.signed_url, media).await?;

        info!(request_id = %signed.request_id, "Upload complete");
        Ok(UploadResult {
            request_id: signed.request_id,
            media_id: Some(signed.media_id),
        })
    }

    /// Phase one: obtain a signed destination for `file_name`.
    pub async fn request_signed_url(&self, file_name: &str) -> Result<SignedUpload> {
        let body = self
            .transport
            .post(
                paths::SIGNED_URL,
                vec![("fileName".to_string(), file_name.to_string())],
                None,
            )
            .await?;
        SignedUpload::from_response(&body)
    }

    /// Phase two: push the file content to the signed destination.
    pub async fn put_to_signed_url(&self, signed_url: &str, media: MediaFile) -> Result<()> {
        let response = self
            .transport
            .put(signed_url, media.content, &media.content_type)
            .await
            .map_err(|e| DetectionError::upload_failed(format!("Upload failed: {}", e)))?;

        if response.status >= 400 {
            warn!(status = response.status, "Signed upload rejected");
            return Err(DetectionError::upload_failed(format!(
                "Upload failed with status {}: {}",
                response.status,
                response.text_lossy()
            )));
        }
        Ok(())
    }
}
