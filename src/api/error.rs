use crate::services::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("{context}: {message}")]
    BadRequest {
        context: &'static str,
        message: String,
    },

    #[error("{context}: {message}")]
    PayloadTooLarge {
        context: &'static str,
        message: String,
    },
}

impl AppError {
    /// Adapter for `map_err` that tags a storage failure with the operation it interrupted.
    pub fn storage(context: &'static str) -> impl FnOnce(StorageError) -> AppError {
        move |source| AppError::Storage { context, source }
    }

    pub fn bad_request(context: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            context,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Storage { source, .. } => match source {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::Conflict(_) => StatusCode::CONFLICT,
                StorageError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                StorageError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
                StorageError::LocalIo(_) | StorageError::Provider(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, self.to_string()).into_response()
    }
}
