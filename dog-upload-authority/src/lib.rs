//! Signing authority for `dog-upload`.
//!
//! Opens S3 multipart sessions, hands out presigned part URLs, completes and aborts sessions.
//! Clients talk to it over the JSON API in [`dog_upload::wire`]; the storage side sits behind
//! [`MultipartBackend`] so the routes can be served against any store.

mod backend;
mod config;
mod error;
mod routes;
mod s3;

pub use backend::MultipartBackend;
pub use config::{S3Settings, ServerSettings, DEFAULT_PRESIGN_EXPIRES_SECS};
pub use error::{ApiError, ApiResult, BackendError, BackendResult, ConfigError};
pub use routes::{router, AuthorityState};
pub use s3::S3Backend;
