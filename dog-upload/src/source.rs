use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::{PartSpec, UploadTarget};

/// Provides the body bytes for a planned part
#[async_trait]
pub trait PartSource: Send + Sync {
    /// Read exactly the bytes of `part`
    async fn read_part(&self, part: &PartSpec) -> std::io::Result<Bytes>;
}

/// In-memory source; parts are zero-copy slices of the buffer
#[derive(Debug, Clone)]
pub struct BytesSource {
    data: Bytes,
}

impl BytesSource {
    pub fn new<B: Into<Bytes>>(data: B) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Target describing this buffer under `name`
    pub fn target<S: Into<String>>(&self, name: S) -> UploadTarget {
        UploadTarget::new(name, self.len())
    }
}

#[async_trait]
impl PartSource for BytesSource {
    async fn read_part(&self, part: &PartSpec) -> std::io::Result<Bytes> {
        if part.end > self.len() || part.start > part.end {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "part {} range {}..{} exceeds buffer of {} bytes",
                    part.part_number,
                    part.start,
                    part.end,
                    self.len()
                ),
            ));
        }
        Ok(self.data.slice(part.start as usize..part.end as usize))
    }
}

/// File on disk; every read opens its own handle so parts can be read concurrently
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Open a file and describe it as an upload target named after the file
    pub async fn open<P: AsRef<Path>>(path: P) -> std::io::Result<(Self, UploadTarget)> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;

        Ok((Self::new(path), UploadTarget::new(name, metadata.len())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PartSource for FileSource {
    async fn read_part(&self, part: &PartSpec) -> std::io::Result<Bytes> {
        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(part.start)).await?;

        let mut buf = vec![0u8; part.len() as usize];
        file.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn range(part_number: u32, start: u64, end: u64) -> PartSpec {
        PartSpec {
            part_number,
            start,
            end,
        }
    }

    #[tokio::test]
    async fn bytes_source_slices_ranges() {
        let source = BytesSource::new(&b"hello world"[..]);
        let part = source.read_part(&range(2, 6, 11)).await.unwrap();
        assert_eq!(&part[..], b"world");
        assert!(source.read_part(&range(3, 6, 12)).await.is_err());
    }

    #[tokio::test]
    async fn file_source_reads_exact_ranges() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abcdefghij").unwrap();

        let (source, target) = FileSource::open(file.path()).await.unwrap();
        assert_eq!(target.total_bytes, 10);
        assert!(!target.name.is_empty());

        let first = source.read_part(&range(1, 0, 4)).await.unwrap();
        let last = source.read_part(&range(3, 8, 10)).await.unwrap();
        assert_eq!(&first[..], b"abcd");
        assert_eq!(&last[..], b"ij");
    }

    #[tokio::test]
    async fn file_source_errors_past_end_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let source = FileSource::new(file.path());

        let err = source.read_part(&range(1, 0, 8)).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn open_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileSource::open(dir.path()).await.is_err());
    }
}
