use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use dog_upload::wire::{
    AbortUploadRequest, AbortUploadResponse, CompleteUploadRequest, CompleteUploadResponse,
    CreateUploadRequest, CreateUploadResponse, PresignPartRequest, PresignPartResponse,
    ABORT_PATH, COMPLETE_PATH, CREATE_PATH, PRESIGN_PATH,
};
use dog_upload::DEFAULT_MAX_PARTS;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{ApiError, ApiResult, MultipartBackend};

#[derive(Clone)]
pub struct AuthorityState {
    backend: Arc<dyn MultipartBackend>,
}

impl AuthorityState {
    pub fn new(backend: Arc<dyn MultipartBackend>) -> Self {
        Self { backend }
    }
}

/// HTTP surface of the signing authority
pub fn router(backend: Arc<dyn MultipartBackend>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/list-buckets", get(list_buckets))
        .route(&format!("/{CREATE_PATH}"), post(create_upload))
        .route(&format!("/{PRESIGN_PATH}"), post(presign_part))
        .route(&format!("/{COMPLETE_PATH}"), post(complete_upload))
        .route(&format!("/{ABORT_PATH}"), post(abort_upload))
        .with_state(AuthorityState::new(backend))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn home() -> Html<&'static str> {
    Html("<h1>Hello Welcome Home!</h1>")
}

async fn list_buckets(State(state): State<AuthorityState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.backend.list_buckets().await?))
}

async fn create_upload(
    State(state): State<AuthorityState>,
    payload: Result<Json<CreateUploadRequest>, JsonRejection>,
) -> ApiResult<Json<CreateUploadResponse>> {
    let Json(req) = payload?;
    require_file_name(&req.file_name)?;

    let upload_id = state.backend.create(&req.file_name).await?;
    tracing::info!(file = %req.file_name, %upload_id, "multipart upload created");
    Ok(Json(CreateUploadResponse { upload_id }))
}

async fn presign_part(
    State(state): State<AuthorityState>,
    payload: Result<Json<PresignPartRequest>, JsonRejection>,
) -> ApiResult<Json<PresignPartResponse>> {
    let Json(req) = payload?;
    require_file_name(&req.file_name)?;
    require_upload_id(&req.upload_id)?;
    require_part_number(req.part_number)?;

    let url = state
        .backend
        .presign_part(&req.file_name, &req.upload_id, req.part_number)
        .await?;
    tracing::debug!(file = %req.file_name, part = req.part_number, "part presigned");
    Ok(Json(PresignPartResponse { url }))
}

async fn complete_upload(
    State(state): State<AuthorityState>,
    payload: Result<Json<CompleteUploadRequest>, JsonRejection>,
) -> ApiResult<Json<CompleteUploadResponse>> {
    let Json(req) = payload?;
    require_file_name(&req.file_name)?;
    require_upload_id(&req.upload_id)?;
    if req.parts.is_empty() {
        return Err(ApiError::bad_request("parts must not be empty"));
    }
    for part in &req.parts {
        require_part_number(part.part_number)?;
    }

    let location = state
        .backend
        .complete(&req.file_name, &req.upload_id, &req.parts)
        .await?;
    tracing::info!(
        file = %req.file_name,
        upload_id = %req.upload_id,
        parts = req.parts.len(),
        "multipart upload completed"
    );
    Ok(Json(CompleteUploadResponse { location }))
}

async fn abort_upload(
    State(state): State<AuthorityState>,
    payload: Result<Json<AbortUploadRequest>, JsonRejection>,
) -> ApiResult<Json<AbortUploadResponse>> {
    let Json(req) = payload?;
    require_file_name(&req.file_name)?;
    require_upload_id(&req.upload_id)?;

    state.backend.abort(&req.file_name, &req.upload_id).await?;
    tracing::info!(file = %req.file_name, upload_id = %req.upload_id, "multipart upload aborted");
    Ok(Json(AbortUploadResponse { aborted: true }))
}

fn require_file_name(file_name: &str) -> ApiResult<()> {
    if file_name.trim().is_empty() {
        return Err(ApiError::bad_request("fileName must not be empty"));
    }
    Ok(())
}

fn require_upload_id(upload_id: &str) -> ApiResult<()> {
    if upload_id.is_empty() {
        return Err(ApiError::bad_request("uploadId must not be empty"));
    }
    Ok(())
}

fn require_part_number(part_number: u32) -> ApiResult<()> {
    if part_number == 0 || part_number > DEFAULT_MAX_PARTS {
        return Err(ApiError::bad_request(format!(
            "partNumber must be between 1 and {DEFAULT_MAX_PARTS}, got {part_number}"
        )));
    }
    Ok(())
}
