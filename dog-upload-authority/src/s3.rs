use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use dog_upload::PartResult;

use crate::{BackendError, BackendResult, MultipartBackend, S3Settings};

/// [`MultipartBackend`] on Amazon S3 or any S3-compatible store
#[derive(Clone)]
pub struct S3Backend {
    client: Client,
    bucket: String,
    presign_expires: Duration,
}

impl S3Backend {
    pub async fn connect(settings: S3Settings) -> Self {
        let credentials = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "environment",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region))
            .credentials_provider(credentials);
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&shared)
                .force_path_style(settings.endpoint_url.is_some())
                .build(),
        );
        Self::new(client, settings.bucket, settings.presign_expires)
    }

    pub fn new(client: Client, bucket: String, presign_expires: Duration) -> Self {
        Self {
            client,
            bucket,
            presign_expires,
        }
    }

    fn bucket(&self) -> BackendResult<&str> {
        if self.bucket.trim().is_empty() {
            return Err(BackendError::InvalidBucket);
        }
        Ok(&self.bucket)
    }
}

#[async_trait]
impl MultipartBackend for S3Backend {
    async fn create(&self, key: &str) -> BackendResult<String> {
        let output = self
            .client
            .create_multipart_upload()
            .bucket(self.bucket()?)
            .key(key)
            .send()
            .await
            .map_err(BackendError::storage)?;

        output
            .upload_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BackendError::incomplete("create_multipart_upload returned no UploadId"))
    }

    async fn presign_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: u32,
    ) -> BackendResult<String> {
        let presigning =
            PresigningConfig::expires_in(self.presign_expires).map_err(BackendError::storage)?;

        let request = self
            .client
            .upload_part()
            .bucket(self.bucket()?)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number as i32)
            .presigned(presigning)
            .await
            .map_err(BackendError::storage)?;

        Ok(request.uri().to_string())
    }

    async fn complete(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[PartResult],
    ) -> BackendResult<Option<String>> {
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(
                parts
                    .iter()
                    .map(|part| {
                        CompletedPart::builder()
                            .part_number(part.part_number as i32)
                            .e_tag(&part.etag)
                            .build()
                    })
                    .collect(),
            ))
            .build();

        let output = self
            .client
            .complete_multipart_upload()
            .bucket(self.bucket()?)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(BackendError::storage)?;

        Ok(output.location)
    }

    async fn abort(&self, key: &str, upload_id: &str) -> BackendResult<()> {
        self.client
            .abort_multipart_upload()
            .bucket(self.bucket()?)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(BackendError::storage)?;
        Ok(())
    }

    async fn list_buckets(&self) -> BackendResult<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(BackendError::storage)?;

        Ok(output
            .buckets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|bucket| bucket.name)
            .collect())
    }
}
