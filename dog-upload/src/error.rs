use thiserror::Error;

/// Result type for upload runs
pub type UploadResult<T> = Result<T, UploadError>;

/// Boxed error used by collaborator implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Phase of a run an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// Input/config checks before the authority is contacted
    Preflight,
    Initiate,
    Sign,
    Transfer,
    Complete,
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UploadPhase::Preflight => "preflight",
            UploadPhase::Initiate => "initiate",
            UploadPhase::Sign => "sign",
            UploadPhase::Transfer => "transfer",
            UploadPhase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Errors that can end an upload run
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to initiate upload session for {object_name}: {source}")]
    SessionInit {
        object_name: String,
        #[source]
        source: AuthorityError,
    },

    #[error("Failed to sign part {part_number}: {source}")]
    Signing {
        part_number: u32,
        #[source]
        source: AuthorityError,
    },

    #[error("Upload of part {part_number} failed: {cause}")]
    PartUpload {
        part_number: u32,
        #[source]
        cause: PartFailure,
    },

    #[error("Failed to complete upload session {session_id}: {source}")]
    Completion {
        session_id: String,
        #[source]
        source: AuthorityError,
    },

    #[error("Part results do not form a complete manifest: {0}")]
    Manifest(#[from] crate::ManifestError),

    #[error("Failed to read part {part_number} from source: {source}")]
    PartRead {
        part_number: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to upload zero-length object {name}")]
    EmptyInput { name: String },

    #[error("Object would need {parts} parts (max: {max})")]
    TooManyParts { parts: u64, max: u32 },

    #[error("Invalid upload configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Part task failed: {message}")]
    TaskFailed { message: String },
}

impl UploadError {
    /// Create an invalid configuration error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Phase the failure belongs to
    pub fn phase(&self) -> UploadPhase {
        match self {
            Self::SessionInit { .. } => UploadPhase::Initiate,
            Self::Signing { .. } => UploadPhase::Sign,
            Self::PartUpload { .. } | Self::PartRead { .. } | Self::TaskFailed { .. } => {
                UploadPhase::Transfer
            }
            Self::Completion { .. } | Self::Manifest(_) => UploadPhase::Complete,
            Self::EmptyInput { .. } | Self::TooManyParts { .. } | Self::InvalidConfig { .. } => {
                UploadPhase::Preflight
            }
        }
    }

    /// Part the failure is attributed to, for part-level failures
    pub fn part_number(&self) -> Option<u32> {
        match self {
            Self::Signing { part_number, .. }
            | Self::PartUpload { part_number, .. }
            | Self::PartRead { part_number, .. } => Some(*part_number),
            _ => None,
        }
    }
}

/// Why a single part transfer was not accepted
#[derive(Error, Debug)]
pub enum PartFailure {
    #[error("storage responded with status {status}")]
    Status { status: u16 },

    #[error("response carried no ETag header")]
    MissingEtag,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors reported by a signing authority
#[derive(Error, Debug)]
pub enum AuthorityError {
    #[error("authority unreachable: {source}")]
    Unreachable {
        #[source]
        source: BoxError,
    },

    #[error("authority rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid authority response: {message}")]
    InvalidResponse { message: String },

    #[error("operation not supported by this authority")]
    Unsupported,
}

impl AuthorityError {
    /// Create an unreachable error from any error type
    pub fn unreachable<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unreachable {
            source: Box::new(error),
        }
    }

    /// Create a rejection error
    pub fn rejected<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

/// Errors reported by a part transport before any response was received
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    pub fn request<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request {
            source: Box::new(error),
        }
    }
}
