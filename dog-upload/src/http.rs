use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, ETAG};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::wire::{
    AbortUploadRequest, AbortUploadResponse, CompleteUploadRequest, CompleteUploadResponse,
    CreateUploadRequest, CreateUploadResponse, ErrorBody, PresignPartRequest, PresignPartResponse,
    ABORT_PATH, COMPLETE_PATH, CREATE_PATH, PRESIGN_PATH,
};
use crate::{
    AuthorityCapabilities, AuthorityError, CompletionAck, CompletionManifest, PartTransport,
    SessionId, SigningAuthority, TransportError, TransportResponse,
};

/// Configuration for [`HttpSigningAuthority`]
#[derive(Debug, Clone)]
pub struct HttpAuthorityConfig {
    /// Base URL the endpoint paths are appended to
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Option<Duration>,

    /// Whether the service exposes the abort endpoint
    pub supports_abort: bool,
}

impl HttpAuthorityConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Some(Duration::from_secs(30)),
            supports_abort: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// For services that only implement create/sign/complete
    pub fn without_abort(mut self) -> Self {
        self.supports_abort = false;
        self
    }
}

/// Signing authority reached over its JSON HTTP API
#[derive(Debug, Clone)]
pub struct HttpSigningAuthority {
    client: reqwest::Client,
    base_url: String,
    supports_abort: bool,
}

impl HttpSigningAuthority {
    pub fn new(config: HttpAuthorityConfig) -> Result<Self, AuthorityError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(AuthorityError::unreachable)?;
        Ok(Self::with_client(client, config))
    }

    /// Create with an existing client
    pub fn with_client(client: reqwest::Client, config: HttpAuthorityConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            supports_abort: config.supports_abort,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, AuthorityError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(AuthorityError::unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(AuthorityError::rejected(status.as_u16(), message));
        }

        response
            .json::<Res>()
            .await
            .map_err(|e| AuthorityError::invalid_response(e.to_string()))
    }
}

#[async_trait]
impl SigningAuthority for HttpSigningAuthority {
    async fn initiate(&self, object_name: &str) -> Result<SessionId, AuthorityError> {
        let response: CreateUploadResponse = self
            .post(
                CREATE_PATH,
                &CreateUploadRequest {
                    file_name: object_name.to_string(),
                },
            )
            .await?;

        if response.upload_id.is_empty() {
            return Err(AuthorityError::invalid_response("empty uploadId"));
        }
        Ok(SessionId::from_string(response.upload_id))
    }

    async fn sign_part(
        &self,
        object_name: &str,
        session_id: &SessionId,
        part_number: u32,
    ) -> Result<String, AuthorityError> {
        let response: PresignPartResponse = self
            .post(
                PRESIGN_PATH,
                &PresignPartRequest {
                    file_name: object_name.to_string(),
                    upload_id: session_id.to_string(),
                    part_number,
                },
            )
            .await?;

        if response.url.is_empty() {
            return Err(AuthorityError::invalid_response("empty presigned url"));
        }
        Ok(response.url)
    }

    async fn complete(
        &self,
        object_name: &str,
        session_id: &SessionId,
        manifest: &CompletionManifest,
    ) -> Result<CompletionAck, AuthorityError> {
        let response: CompleteUploadResponse = self
            .post(
                COMPLETE_PATH,
                &CompleteUploadRequest {
                    file_name: object_name.to_string(),
                    upload_id: session_id.to_string(),
                    parts: manifest.parts().to_vec(),
                },
            )
            .await?;

        Ok(CompletionAck {
            location: response.location,
        })
    }

    async fn abort(&self, object_name: &str, session_id: &SessionId) -> Result<(), AuthorityError> {
        if !self.supports_abort {
            return Err(AuthorityError::Unsupported);
        }

        let response: AbortUploadResponse = self
            .post(
                ABORT_PATH,
                &AbortUploadRequest {
                    file_name: object_name.to_string(),
                    upload_id: session_id.to_string(),
                },
            )
            .await?;

        if !response.aborted {
            return Err(AuthorityError::invalid_response("abort not acknowledged"));
        }
        Ok(())
    }

    fn capabilities(&self) -> AuthorityCapabilities {
        if self.supports_abort {
            AuthorityCapabilities::basic().with_abort()
        } else {
            AuthorityCapabilities::basic()
        }
    }
}

/// Part transport issuing plain HTTP PUTs to presigned URLs
#[derive(Debug, Clone, Default)]
pub struct HttpPartTransport {
    client: reqwest::Client,
}

impl HttpPartTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PartTransport for HttpPartTransport {
    async fn put(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(TransportError::request)?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(TransportResponse {
            status: response.status().as_u16(),
            etag,
        })
    }
}
