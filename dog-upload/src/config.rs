use crate::{UploadError, UploadResult};

/// Default part size: 5 MiB
pub const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of parts accepted by S3-style multipart uploads
pub const DEFAULT_MAX_PARTS: u32 = 10_000;

/// What to do with a zero-length input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputPolicy {
    /// Fail before contacting the authority
    #[default]
    Reject,
    /// Upload a single empty part numbered 1
    SingleEmptyPart,
}

/// Configuration for multipart upload runs
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Size of every part except possibly the last
    pub part_size: u64,

    /// Upper bound on the number of parts for one object
    pub max_parts: u32,

    /// Cap on parts in flight at once; `None` launches every part immediately
    pub max_concurrency: Option<usize>,

    /// Zero-length input handling
    pub empty_input: EmptyInputPolicy,

    /// Ask the authority to abort the session when a run fails
    pub abort_on_failure: bool,

    /// Cancel sibling part tasks once one part fails
    pub cancel_on_failure: bool,

    /// Content type sent with each part body
    pub content_type: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            max_parts: DEFAULT_MAX_PARTS,
            max_concurrency: None,
            empty_input: EmptyInputPolicy::Reject,
            abort_on_failure: true,
            cancel_on_failure: true,
            content_type: "application/octet-stream".to_string(),
        }
    }
}

impl UploadConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set part size
    pub fn with_part_size(mut self, bytes: u64) -> Self {
        self.part_size = bytes;
        self
    }

    /// Set max parts
    pub fn with_max_parts(mut self, max: u32) -> Self {
        self.max_parts = max;
        self
    }

    /// Limit the number of parts in flight
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// Choose zero-length input handling
    pub fn with_empty_input(mut self, policy: EmptyInputPolicy) -> Self {
        self.empty_input = policy;
        self
    }

    /// Leave failed sessions on the server for the authority to expire
    pub fn keep_failed_sessions(mut self) -> Self {
        self.abort_on_failure = false;
        self
    }

    /// Let sibling parts run to completion after a failure; the run still reports the first error
    pub fn let_siblings_finish(mut self) -> Self {
        self.cancel_on_failure = false;
        self
    }

    /// Set the part content type
    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Check the config is usable
    pub fn validate(&self) -> UploadResult<()> {
        if self.part_size == 0 {
            return Err(UploadError::invalid("part_size must be greater than zero"));
        }
        if self.max_parts == 0 {
            return Err(UploadError::invalid("max_parts must be greater than zero"));
        }
        if self.max_concurrency == Some(0) {
            return Err(UploadError::invalid(
                "max_concurrency must be greater than zero when set",
            ));
        }
        Ok(())
    }
}
