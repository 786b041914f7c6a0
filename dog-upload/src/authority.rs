use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    AuthorityError, CompletionManifest, PartSpec, SessionId, SignedPartRequest, UploadError,
    UploadResult, UploadSession, UploadTarget,
};

/// Acknowledgement returned by the authority once a session is completed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionAck {
    /// Location of the assembled object, when the authority reports one
    pub location: Option<String>,
}

/// Optional authority capabilities
#[derive(Debug, Clone, Default)]
pub struct AuthorityCapabilities {
    pub supports_abort: bool,
}

impl AuthorityCapabilities {
    pub fn basic() -> Self {
        Self {
            supports_abort: false,
        }
    }

    pub fn with_abort(mut self) -> Self {
        self.supports_abort = true;
        self
    }
}

/// Backend service that owns multipart sessions and signs per-part URLs
#[async_trait]
pub trait SigningAuthority: Send + Sync {
    /// Allocate a new multipart session for `object_name`
    async fn initiate(&self, object_name: &str) -> Result<SessionId, AuthorityError>;

    /// Issue a presigned URL for one part of a session
    async fn sign_part(
        &self,
        object_name: &str,
        session_id: &SessionId,
        part_number: u32,
    ) -> Result<String, AuthorityError>;

    /// Stitch the uploaded parts into the final object
    async fn complete(
        &self,
        object_name: &str,
        session_id: &SessionId,
        manifest: &CompletionManifest,
    ) -> Result<CompletionAck, AuthorityError>;

    /// Discard a session and its uploaded parts
    async fn abort(
        &self,
        _object_name: &str,
        _session_id: &SessionId,
    ) -> Result<(), AuthorityError> {
        Err(AuthorityError::Unsupported)
    }

    /// Get authority capabilities
    fn capabilities(&self) -> AuthorityCapabilities {
        AuthorityCapabilities::basic()
    }
}

/// Sequences calls against the signing authority for upload runs
#[derive(Clone)]
pub struct SessionCoordinator {
    authority: Arc<dyn SigningAuthority>,
}

impl SessionCoordinator {
    pub fn new(authority: Arc<dyn SigningAuthority>) -> Self {
        Self { authority }
    }

    /// Open a session for the target. Nothing may be uploaded before this returns.
    pub async fn initiate_session(&self, target: &UploadTarget) -> UploadResult<UploadSession> {
        let session_id = self
            .authority
            .initiate(&target.name)
            .await
            .map_err(|source| UploadError::SessionInit {
                object_name: target.name.clone(),
                source,
            })?;

        info!(object = %target.name, session_id = %session_id, "multipart session initiated");

        Ok(UploadSession {
            target: target.clone(),
            session_id,
        })
    }

    /// Obtain the presigned URL for one part
    pub async fn sign_part(
        &self,
        session: &UploadSession,
        part: PartSpec,
    ) -> UploadResult<SignedPartRequest> {
        let url = self
            .authority
            .sign_part(&session.target.name, &session.session_id, part.part_number)
            .await
            .map_err(|source| UploadError::Signing {
                part_number: part.part_number,
                source,
            })?;

        debug!(part_number = part.part_number, "part signed");
        Ok(SignedPartRequest { part, url })
    }

    /// Submit the manifest; consumes it so it is only ever sent once
    pub async fn complete(
        &self,
        session: &UploadSession,
        manifest: CompletionManifest,
    ) -> UploadResult<CompletionAck> {
        self.authority
            .complete(&session.target.name, &session.session_id, &manifest)
            .await
            .map_err(|source| UploadError::Completion {
                session_id: session.session_id.to_string(),
                source,
            })
    }

    /// Best-effort abort. Returns whether the authority confirmed it.
    pub async fn abort_session(&self, session: &UploadSession) -> bool {
        if !self.authority.capabilities().supports_abort {
            debug!(
                session_id = %session.session_id,
                "authority cannot abort sessions, leaving it to expire"
            );
            return false;
        }

        match self
            .authority
            .abort(&session.target.name, &session.session_id)
            .await
        {
            Ok(()) => {
                info!(session_id = %session.session_id, "multipart session aborted");
                true
            }
            Err(e) => {
                warn!(
                    session_id = %session.session_id,
                    error = %e,
                    "failed to abort multipart session"
                );
                false
            }
        }
    }
}
