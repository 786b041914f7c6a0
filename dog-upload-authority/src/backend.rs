use async_trait::async_trait;
use dog_upload::PartResult;

use crate::BackendResult;

/// Object storage that can run multipart sessions and presign part PUTs.
///
/// `key` is the object name the client asked for; `upload_id` is the storage-issued session id.
#[async_trait]
pub trait MultipartBackend: Send + Sync {
    /// Open a multipart session and return its upload id
    async fn create(&self, key: &str) -> BackendResult<String>;

    /// Presigned URL authorizing one PUT of `part_number`
    async fn presign_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: u32,
    ) -> BackendResult<String>;

    /// Stitch the listed parts together; returns the object location when storage reports one
    async fn complete(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[PartResult],
    ) -> BackendResult<Option<String>>;

    async fn abort(&self, key: &str, upload_id: &str) -> BackendResult<()>;

    async fn list_buckets(&self) -> BackendResult<Vec<String>>;
}
