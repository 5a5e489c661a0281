use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Describes a file held in a bucket. `status` is a free-form label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct S3File {
    pub file_name: String,
    pub bucket_name: String,
    pub status: String,
}

impl S3File {
    pub fn new(
        file_name: impl Into<String>,
        bucket_name: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bucket_name: bucket_name.into(),
            status: status.into(),
        }
    }
}
