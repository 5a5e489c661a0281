use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub const UPLOAD_FAILED: &str = "File upload failed";
pub const DOWNLOAD_FAILED: &str = "Failed to retrieve file";
pub const DELETE_FAILED: &str = "File deletion failed";
pub const CREATE_BUCKET_FAILED: &str = "Bucket creation failed";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadParams {
    /// Target bucket; may also be sent as a multipart field
    #[serde(rename = "bucketName")]
    pub bucket_name: Option<String>,
}

/// Multipart body accepted by the upload endpoint.
#[derive(Deserialize, ToSchema)]
pub struct UploadForm {
    /// File content; its original filename becomes the object key
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    #[serde(rename = "bucketName")]
    pub bucket_name: Option<String>,
}
