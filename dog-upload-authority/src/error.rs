use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dog_upload::wire::ErrorBody;
use dog_upload::BoxError;
use thiserror::Error;

pub type BackendResult<T> = std::result::Result<T, BackendError>;
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failures raised by a [`MultipartBackend`](crate::MultipartBackend)
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Invalid S3 bucket name")]
    InvalidBucket,

    #[error("storage backend error: {source}")]
    Storage {
        #[source]
        source: BoxError,
    },

    #[error("storage backend returned an incomplete response: {message}")]
    IncompleteResponse { message: String },
}

impl BackendError {
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }

    pub fn incomplete<S: Into<String>>(message: S) -> Self {
        Self::IncompleteResponse {
            message: message.into(),
        }
    }
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} environment variable required")]
    Missing { key: &'static str },

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Error returned from a route handler, rendered as `{ "error": message }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Backend(BackendError::InvalidBucket) => StatusCode::BAD_REQUEST,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
