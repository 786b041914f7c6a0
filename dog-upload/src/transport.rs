use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::{PartFailure, PartResult, SignedPartRequest, TransportError, UploadError, UploadResult};

/// Raw response to a part PUT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Value of the `ETag` response header, verbatim
    pub etag: Option<String>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues binary PUTs against presigned URLs
#[async_trait]
pub trait PartTransport: Send + Sync {
    async fn put(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<TransportResponse, TransportError>;
}

/// Uploads single parts and turns transport responses into part results
#[derive(Clone)]
pub struct PartUploader {
    transport: Arc<dyn PartTransport>,
    content_type: String,
}

impl PartUploader {
    pub fn new<S: Into<String>>(transport: Arc<dyn PartTransport>, content_type: S) -> Self {
        Self {
            transport,
            content_type: content_type.into(),
        }
    }

    /// PUT one part's body to its signed URL and capture the entity tag
    pub async fn upload_part(
        &self,
        request: &SignedPartRequest,
        body: Bytes,
    ) -> UploadResult<PartResult> {
        let part_number = request.part.part_number;
        let fail = |cause: PartFailure| UploadError::PartUpload { part_number, cause };

        let response = self
            .transport
            .put(&request.url, &self.content_type, body)
            .await
            .map_err(|e| fail(e.into()))?;

        if !response.is_success() {
            return Err(fail(PartFailure::Status {
                status: response.status,
            }));
        }

        let etag = response.etag.ok_or_else(|| fail(PartFailure::MissingEtag))?;
        debug!(part_number, etag = %etag, "part uploaded");

        Ok(PartResult { part_number, etag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PartSpec;

    struct Canned(TransportResponse);

    #[async_trait]
    impl PartTransport for Canned {
        async fn put(
            &self,
            _url: &str,
            _content_type: &str,
            _body: Bytes,
        ) -> Result<TransportResponse, TransportError> {
            Ok(self.0.clone())
        }
    }

    fn request() -> SignedPartRequest {
        SignedPartRequest {
            part: PartSpec {
                part_number: 4,
                start: 0,
                end: 10,
            },
            url: "https://bucket.example/key?partNumber=4".to_string(),
        }
    }

    fn uploader(status: u16, etag: Option<&str>) -> PartUploader {
        PartUploader::new(
            Arc::new(Canned(TransportResponse {
                status,
                etag: etag.map(str::to_string),
            })),
            "application/octet-stream",
        )
    }

    #[tokio::test]
    async fn keeps_etag_verbatim() {
        let result = uploader(200, Some("\"9b2cf535f27731c974343645a3985328\""))
            .upload_part(&request(), Bytes::from_static(b"0123456789"))
            .await
            .unwrap();
        assert_eq!(result.part_number, 4);
        assert_eq!(result.etag, "\"9b2cf535f27731c974343645a3985328\"");
    }

    #[tokio::test]
    async fn non_success_status_fails_the_part() {
        let err = uploader(403, None)
            .upload_part(&request(), Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::PartUpload {
                part_number: 4,
                cause: PartFailure::Status { status: 403 }
            }
        ));
    }

    #[tokio::test]
    async fn missing_etag_fails_the_part() {
        let err = uploader(200, None)
            .upload_part(&request(), Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::PartUpload {
                cause: PartFailure::MissingEtag,
                ..
            }
        ));
    }
}
