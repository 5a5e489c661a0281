use crate::api::error::AppError;
use crate::services::storage::StorageError;
use axum::{
    extract::{
        Multipart, Query, State,
        multipart::{Field, MultipartError, MultipartRejection},
        rejection::QueryRejection,
    },
    http::StatusCode,
};
use futures::TryStreamExt;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use super::types::*;

#[utoipa::path(
    post,
    path = "/api/s3/upload",
    params(UploadParams),
    request_body(content = UploadForm, content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 200, description = "File uploaded", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing file or bucket name"),
        (status = 404, description = "Bucket not found"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Upload failed")
    ),
    tag = "objects"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    query: Result<Query<UploadParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    let mut multipart =
        multipart.map_err(|e| AppError::bad_request(UPLOAD_FAILED, e.body_text()))?;
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            drain(&mut multipart).await;
            return Err(AppError::bad_request(UPLOAD_FAILED, e.body_text()));
        }
    };

    let mut bucket_name = params.bucket_name;
    let mut staged: Option<(String, NamedTempFile)> = None;

    let result: Result<String, AppError> = async {
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "file" {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| AppError::bad_request(UPLOAD_FAILED, "File has no name"))?;

                let temp_file = stage_field(field).await?;
                staged = Some((file_name, temp_file));
            } else if name == "bucketName" {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    bucket_name = Some(text.trim().to_string());
                }
            }
        }

        let bucket = bucket_name
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| AppError::bad_request(UPLOAD_FAILED, "No bucketName provided"))?;
        let (key, temp_file) =
            staged.ok_or_else(|| AppError::bad_request(UPLOAD_FAILED, "No file provided"))?;

        // temp_file is removed from disk when it drops at the end of this block
        state
            .objects
            .upload_file(&bucket, &key, temp_file.path())
            .await
            .map_err(AppError::storage(UPLOAD_FAILED))
    }
    .await;

    match result {
        Ok(message) => Ok(message),
        Err(e) => {
            drain(&mut multipart).await;
            Err(e)
        }
    }
}

/// Reads the rest of the body so the client sees our response instead of a reset.
async fn drain(multipart: &mut Multipart) {
    while let Ok(Some(mut field)) = multipart.next_field().await {
        while let Ok(Some(_)) = field.chunk().await {}
    }
}

/// Streams a multipart field into a fresh temporary file.
async fn stage_field(field: Field<'_>) -> Result<NamedTempFile, AppError> {
    let local_io = |e: std::io::Error| AppError::storage(UPLOAD_FAILED)(StorageError::LocalIo(e));

    let temp_file = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile()
        .map_err(local_io)?;
    let mut writer = tokio::fs::File::from_std(temp_file.reopen().map_err(local_io)?);

    let reader = StreamReader::new(field.map_err(std::io::Error::other));
    tokio::pin!(reader);
    if let Err(e) = tokio::io::copy(&mut reader, &mut writer).await {
        let from_client = e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
            .map(|m| (m.status(), m.body_text()));

        return Err(match from_client {
            Some((status, text)) => rejection(status, text),
            None => local_io(e),
        });
    }

    writer.flush().await.map_err(local_io)?;
    Ok(temp_file)
}

fn multipart_error(e: MultipartError) -> AppError {
    rejection(e.status(), e.body_text())
}

fn rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            context: UPLOAD_FAILED,
            message: "File exceeds the maximum allowed size".to_string(),
        }
    } else {
        AppError::bad_request(UPLOAD_FAILED, message)
    }
}
