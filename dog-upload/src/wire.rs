//! JSON bodies exchanged with the signing authority.
//!
//! Field names follow the authority's camelCase API; manifest entries keep the object-storage
//! names `PartNumber` and `ETag` so the authority can forward them to storage untouched.

use serde::{Deserialize, Serialize};

use crate::PartResult;

pub const CREATE_PATH: &str = "create-multipart-upload";
pub const PRESIGN_PATH: &str = "get-presigned-url";
pub const COMPLETE_PATH: &str = "complete-multipart-upload";
pub const ABORT_PATH: &str = "abort-multipart-upload";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadRequest {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadResponse {
    pub upload_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignPartRequest {
    pub file_name: String,
    pub upload_id: String,
    pub part_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignPartResponse {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    pub file_name: String,
    pub upload_id: String,
    pub parts: Vec<PartResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompleteUploadResponse {
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortUploadRequest {
    pub file_name: String,
    pub upload_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortUploadResponse {
    pub aborted: bool,
}

/// Error body returned by the authority on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
