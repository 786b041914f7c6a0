//! # dog-upload: presigned multipart uploads
//!
//! `dog-upload` drives large-object uploads through a backend that hands out per-part presigned
//! URLs. The object is split into fixed-size parts, a multipart session is opened with the
//! signing authority, every part is signed and PUT concurrently, and the collected entity tags are
//! submitted as an ordered manifest to stitch the object together.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dog_upload::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> UploadResult<()> {
//! let authority = HttpSigningAuthority::new(HttpAuthorityConfig::new("http://localhost:5000"))
//!     .expect("http client");
//! let uploader =
//!     MultipartUploader::new(authority, HttpPartTransport::new(), UploadConfig::default());
//!
//! let (source, target) = FileSource::open("movie.mp4").await.expect("readable file");
//! let receipt = uploader.upload(target, source).await?;
//! println!("stored {} in {} parts", receipt.object_name, receipt.part_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  MultipartUploader   │  ← run state machine, fan-out / fan-in
//! ├──────────┬───────────┤
//! │ Session  │   Part    │
//! │Coordinat.│ Uploader  │  ← protocol phases
//! ├──────────┼───────────┤
//! │ Signing  │   Part    │
//! │Authority │ Transport │  ← collaborators (HTTP or your own)
//! └──────────┴───────────┘
//! ```
//!
//! The collaborators are traits, so runs can be driven against fakes in tests and against any
//! backend speaking a different API in production.

mod authority;
mod config;
mod coordinator;
mod error;
pub mod http;
mod manifest;
pub mod planner;
mod receipt;
mod source;
mod transport;
mod types;
pub mod wire;

// Re-export main types for clean API
pub use authority::{AuthorityCapabilities, CompletionAck, SessionCoordinator, SigningAuthority};
pub use config::{EmptyInputPolicy, UploadConfig, DEFAULT_MAX_PARTS, DEFAULT_PART_SIZE};
pub use coordinator::{MultipartUploader, UploadHandle};
pub use error::{
    AuthorityError, BoxError, PartFailure, TransportError, UploadError, UploadPhase, UploadResult,
};
pub use http::{HttpAuthorityConfig, HttpPartTransport, HttpSigningAuthority};
pub use manifest::{CompletionManifest, ManifestError};
pub use planner::plan;
pub use receipt::UploadReceipt;
pub use source::{BytesSource, FileSource, PartSource};
pub use transport::{PartTransport, PartUploader, TransportResponse};
pub use types::{
    PartResult, PartSpec, RunId, SessionId, SignedPartRequest, UploadSession, UploadState,
    UploadTarget,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BytesSource, FileSource, HttpAuthorityConfig, HttpPartTransport, HttpSigningAuthority,
        MultipartUploader, UploadConfig, UploadError, UploadReceipt, UploadResult, UploadState,
        UploadTarget,
    };
}
