use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one upload run, used for log correlation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random run ID
    pub fn new() -> Self {
        Self(format!("run_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque multipart session identifier issued by the signing authority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create from existing string
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The object being uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub name: String,
    pub total_bytes: u64,
}

impl UploadTarget {
    pub fn new<S: Into<String>>(name: S, total_bytes: u64) -> Self {
        Self {
            name: name.into(),
            total_bytes,
        }
    }
}

/// One planned part: a 1-based number and a half-open byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSpec {
    pub part_number: u32,
    pub start: u64,
    pub end: u64,
}

impl PartSpec {
    /// Number of bytes covered by this part
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An initiated multipart session for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub target: UploadTarget,
    pub session_id: SessionId,
}

/// Presigned URL for exactly one part of one session
#[derive(Debug, Clone)]
pub struct SignedPartRequest {
    pub part: PartSpec,
    pub url: String,
}

/// Outcome of a successful part transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartResult {
    #[serde(rename = "PartNumber")]
    pub part_number: u32,
    #[serde(rename = "ETag")]
    pub etag: String,
}

/// Lifecycle of one upload run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    SessionInitiated,
    PartsInFlight,
    PartsComplete,
    Finalized,
    Failed,
}

impl UploadState {
    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Finalized | UploadState::Failed)
    }

    /// Display progress: parts are not aggregated, so this is 0 until finalized
    pub fn percent(&self) -> u8 {
        match self {
            UploadState::Finalized => 100,
            _ => 0,
        }
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_advance_to(&self, next: UploadState) -> bool {
        use UploadState::*;
        matches!(
            (self, next),
            (Idle, SessionInitiated)
                | (Idle, Failed)
                | (SessionInitiated, PartsInFlight)
                | (SessionInitiated, Failed)
                | (PartsInFlight, PartsComplete)
                | (PartsInFlight, Failed)
                | (PartsComplete, Finalized)
                | (PartsComplete, Failed)
        )
    }
}

impl std::fmt::Display for UploadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UploadState::Idle => "idle",
            UploadState::SessionInitiated => "session_initiated",
            UploadState::PartsInFlight => "parts_in_flight",
            UploadState::PartsComplete => "parts_complete",
            UploadState::Finalized => "finalized",
            UploadState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_machine_has_no_way_back_to_idle() {
        use UploadState::*;
        for state in [Idle, SessionInitiated, PartsInFlight, PartsComplete, Finalized, Failed] {
            assert!(!state.can_advance_to(Idle));
        }
        assert!(!Finalized.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(SessionInitiated));
        assert!(!Idle.can_advance_to(PartsInFlight));
        assert!(PartsComplete.can_advance_to(Failed));
    }

    #[test]
    fn only_finalized_reports_full_progress() {
        assert_eq!(UploadState::Finalized.percent(), 100);
        assert_eq!(UploadState::PartsComplete.percent(), 0);
        assert_eq!(UploadState::Failed.percent(), 0);
    }

    #[test]
    fn part_result_uses_storage_field_names() {
        let part = PartResult {
            part_number: 3,
            etag: "\"abc\"".to_string(),
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"PartNumber": 3, "ETag": "\"abc\""}));
    }
}
