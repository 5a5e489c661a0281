use crate::api::error::AppError;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tokio_util::io::ReaderStream;

use super::types::*;

#[utoipa::path(
    get,
    path = "/api/s3/download/{bucketName}/{fileName}",
    params(
        ("bucketName" = String, Path, description = "Bucket holding the object"),
        ("fileName" = String, Path, description = "Object key")
    ),
    responses(
        (status = 200, description = "File content stream", content_type = "application/octet-stream"),
        (status = 403, description = "Access denied by the object store"),
        (status = 404, description = "Bucket or object not found"),
        (status = 500, description = "Retrieval failed")
    ),
    tag = "objects"
)]
pub async fn download_file(
    State(state): State<crate::AppState>,
    Path((bucket_name, file_name)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let object = state
        .objects
        .download_file(&bucket_name, &file_name)
        .await
        .map_err(AppError::storage(DOWNLOAD_FAILED))?;

    // Stream straight from the object store, nothing is buffered here
    let body = Body::from_stream(ReaderStream::new(object.body.into_async_read()));

    let mut response = (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        body,
    )
        .into_response();

    if let Some(len) = object.content_length.filter(|len| *len >= 0) {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    Ok(response)
}

/// Bytes outside RFC 5987 `attr-char`, which must be percent-encoded in `filename*`.
const ATTR_CHAR_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `attachment; filename=<name>` for plain names, RFC 5987 encoding otherwise.
pub fn content_disposition(file_name: &str) -> String {
    let is_token = !file_name.is_empty()
        && file_name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b';' | b',' | b'\\'));

    if is_token {
        format!("attachment; filename={}", file_name)
    } else {
        format!(
            "attachment; filename*=UTF-8''{}",
            utf8_percent_encode(file_name, ATTR_CHAR_ESCAPES)
        )
    }
}
