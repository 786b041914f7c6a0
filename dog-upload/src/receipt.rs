use serde::Serialize;

use crate::{PartResult, RunId, SessionId};

/// Receipt returned after a run reached `Finalized`
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub run_id: RunId,
    pub object_name: String,
    pub session_id: SessionId,
    pub total_bytes: u64,
    pub part_size: u64,
    /// The manifest submitted to the authority, ascending by part number
    pub parts: Vec<PartResult>,
    pub location: Option<String>,
    pub completed_at: i64,
}

impl UploadReceipt {
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}
