use crate::api::error::AppError;
use axum::extract::{Path, State};

use super::types::*;

#[utoipa::path(
    delete,
    path = "/api/s3/delete/{bucketName}/{fileName}",
    params(
        ("bucketName" = String, Path, description = "Bucket holding the object"),
        ("fileName" = String, Path, description = "Object key")
    ),
    responses(
        (status = 200, description = "File deleted (also when it never existed)", body = String, content_type = "text/plain"),
        (status = 403, description = "Access denied by the object store"),
        (status = 404, description = "Bucket not found"),
        (status = 500, description = "Deletion failed")
    ),
    tag = "objects"
)]
pub async fn delete_file(
    State(state): State<crate::AppState>,
    Path((bucket_name, file_name)): Path<(String, String)>,
) -> Result<String, AppError> {
    state
        .objects
        .delete_file(&bucket_name, &file_name)
        .await
        .map_err(AppError::storage(DELETE_FAILED))
}

#[utoipa::path(
    post,
    path = "/api/s3/create-bucket/{bucketName}",
    params(
        ("bucketName" = String, Path, description = "Name of the bucket to create")
    ),
    responses(
        (status = 200, description = "Bucket created", body = String, content_type = "text/plain"),
        (status = 403, description = "Access denied by the object store"),
        (status = 409, description = "Bucket already exists"),
        (status = 500, description = "Creation failed")
    ),
    tag = "buckets"
)]
pub async fn create_bucket(
    State(state): State<crate::AppState>,
    Path(bucket_name): Path<String>,
) -> Result<String, AppError> {
    state
        .objects
        .create_bucket(&bucket_name)
        .await
        .map_err(AppError::storage(CREATE_BUCKET_FAILED))
}

#[utoipa::path(
    get,
    path = "/api/s3/url/{bucketName}/{fileName}",
    params(
        ("bucketName" = String, Path, description = "Bucket holding the object"),
        ("fileName" = String, Path, description = "Object key")
    ),
    responses(
        (status = 200, description = "Public URL of the object", body = String, content_type = "text/plain")
    ),
    tag = "objects"
)]
pub async fn file_url(
    State(state): State<crate::AppState>,
    Path((bucket_name, file_name)): Path<(String, String)>,
) -> String {
    state.objects.file_url(&bucket_name, &file_name)
}
