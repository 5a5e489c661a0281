use crate::config::StorageConfig;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::{ByteStream, ByteStreamError};
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::Path;
use thiserror::Error;

/// Failure kinds surfaced by the object store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Transient(String),

    #[error(transparent)]
    LocalIo(#[from] std::io::Error),

    #[error("{0}")]
    Provider(String),
}

impl From<ByteStreamError> for StorageError {
    fn from(err: ByteStreamError) -> Self {
        StorageError::LocalIo(std::io::Error::other(err))
    }
}

impl<E> From<SdkError<E, HttpResponse>> for StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    fn from(err: SdkError<E, HttpResponse>) -> Self {
        let message = match (err.code(), err.message()) {
            (Some(code), Some(msg)) => format!("{}: {}", code, msg),
            (Some(code), None) => code.to_string(),
            _ => DisplayErrorContext(&err).to_string(),
        };

        match &err {
            SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
                StorageError::Transient(message)
            }
            SdkError::ServiceError(ctx) => {
                classify(ctx.err().code(), ctx.raw().status().as_u16(), message)
            }
            SdkError::ResponseError(ctx) => classify(None, ctx.raw().status().as_u16(), message),
            _ => StorageError::Provider(message),
        }
    }
}

/// Maps an S3 error code and HTTP status onto a [`StorageError`].
/// Error codes win over the status since some providers answer 400 for conflicts.
pub fn classify(code: Option<&str>, status: u16, message: String) -> StorageError {
    match code {
        Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => StorageError::NotFound(message),
        Some("BucketAlreadyExists" | "BucketAlreadyOwnedByYou") => StorageError::Conflict(message),
        Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch") => {
            StorageError::PermissionDenied(message)
        }
        Some("SlowDown" | "ServiceUnavailable" | "InternalError" | "RequestTimeout") => {
            StorageError::Transient(message)
        }
        _ => match status {
            404 => StorageError::NotFound(message),
            409 => StorageError::Conflict(message),
            401 | 403 => StorageError::PermissionDenied(message),
            500..=599 => StorageError::Transient(message),
            _ => StorageError::Provider(message),
        },
    }
}

/// An object body together with the metadata needed to serve it.
pub struct ObjectDownload {
    pub body: ByteStream,
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError>;
    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StorageError>;
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectDownload, StorageError>;
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
    fn object_url(&self, bucket: &str, key: &str) -> String;
}

pub struct S3StorageService {
    client: Client,
    config: StorageConfig,
}

impl S3StorageService {
    pub fn new(client: Client, config: StorageConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if self.config.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(
                        self.config.region.as_str(),
                    ))
                    .build(),
            );
        }

        request.send().await?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StorageError> {
        let body = ByteStream::from_path(path).await?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectDownload, StorageError> {
        let res = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        Ok(ObjectDownload {
            content_length: res.content_length,
            content_type: res.content_type,
            body: res.body,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        build_object_url(&self.config, bucket, key)
    }
}

const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Public URL of an object, following the addressing style of the configured endpoint.
pub fn build_object_url(config: &StorageConfig, bucket: &str, key: &str) -> String {
    let key = key
        .split('/')
        .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");

    match config.endpoint_url.as_deref() {
        Some(endpoint) if config.force_path_style => format!("{}/{}/{}", endpoint, bucket, key),
        Some(endpoint) => match endpoint.split_once("://") {
            Some((scheme, host)) => format!("{}://{}.{}/{}", scheme, bucket, host, key),
            None => format!("https://{}.{}/{}", bucket, endpoint, key),
        },
        None if config.force_path_style => format!(
            "https://s3.{}.amazonaws.com/{}/{}",
            config.region, bucket, key
        ),
        None => format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            bucket, config.region, key
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::operation::create_bucket::CreateBucketError;
    use aws_sdk_s3::operation::get_object::GetObjectError;
    use aws_smithy_runtime_api::client::result::ConnectorError;
    use aws_smithy_types::body::SdkBody;
    use aws_smithy_types::error::ErrorMetadata;

    fn storage_config(endpoint_url: Option<&str>, force_path_style: bool) -> StorageConfig {
        StorageConfig {
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            region: "eu-central-1".to_string(),
            endpoint_url: endpoint_url.map(String::from),
            force_path_style,
        }
    }

    #[test]
    fn test_classify_by_error_code() {
        let msg = || "boom".to_string();
        assert!(matches!(
            classify(Some("NoSuchKey"), 404, msg()),
            StorageError::NotFound(_)
        ));
        assert!(matches!(
            classify(Some("NoSuchBucket"), 404, msg()),
            StorageError::NotFound(_)
        ));
        assert!(matches!(
            classify(Some("BucketAlreadyOwnedByYou"), 409, msg()),
            StorageError::Conflict(_)
        ));
        assert!(matches!(
            classify(Some("BucketAlreadyExists"), 400, msg()),
            StorageError::Conflict(_)
        ));
        assert!(matches!(
            classify(Some("AccessDenied"), 403, msg()),
            StorageError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify(Some("SlowDown"), 503, msg()),
            StorageError::Transient(_)
        ));
    }

    #[test]
    fn test_classify_falls_back_to_status() {
        assert!(matches!(
            classify(None, 404, "head".to_string()),
            StorageError::NotFound(_)
        ));
        assert!(matches!(
            classify(Some("Unknown"), 403, "x".to_string()),
            StorageError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify(None, 502, "x".to_string()),
            StorageError::Transient(_)
        ));
        assert!(matches!(
            classify(Some("InvalidBucketName"), 400, "x".to_string()),
            StorageError::Provider(_)
        ));
    }

    #[test]
    fn test_classified_message_is_preserved() {
        let err = classify(Some("NoSuchKey"), 404, "NoSuchKey: gone".to_string());
        assert_eq!(err.to_string(), "NoSuchKey: gone");
    }

    fn service_error<E>(err: E, status: u16) -> SdkError<E, HttpResponse> {
        let status = aws_smithy_runtime_api::http::StatusCode::try_from(status).unwrap();
        SdkError::service_error(err, HttpResponse::new(status, SdkBody::empty()))
    }

    #[test]
    fn test_network_failures_are_transient() {
        let err = SdkError::<GetObjectError, HttpResponse>::timeout_error("operation timed out");
        assert!(matches!(StorageError::from(err), StorageError::Transient(_)));

        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = SdkError::<GetObjectError, HttpResponse>::dispatch_failure(ConnectorError::io(
            Box::new(reset),
        ));
        assert!(matches!(StorageError::from(err), StorageError::Transient(_)));
    }

    #[test]
    fn test_service_error_uses_code_and_message() {
        let meta = ErrorMetadata::builder()
            .code("NoSuchKey")
            .message("The specified key does not exist.")
            .build();
        let err = StorageError::from(service_error(GetObjectError::generic(meta), 404));
        assert!(matches!(err, StorageError::NotFound(_)));
        assert_eq!(err.to_string(), "NoSuchKey: The specified key does not exist.");

        // Some providers answer 400 for an existing bucket, the code decides
        let meta = ErrorMetadata::builder().code("BucketAlreadyExists").build();
        let err = StorageError::from(service_error(CreateBucketError::generic(meta), 400));
        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(err.to_string(), "BucketAlreadyExists");
    }

    #[test]
    fn test_service_error_without_code_falls_back_to_status() {
        let meta = ErrorMetadata::builder().build();
        let err = StorageError::from(service_error(GetObjectError::generic(meta), 503));
        assert!(matches!(err, StorageError::Transient(_)));
    }

    #[test]
    fn test_virtual_hosted_url() {
        let config = storage_config(None, false);
        assert_eq!(
            build_object_url(&config, "docs", "report.pdf"),
            "https://docs.s3.eu-central-1.amazonaws.com/report.pdf"
        );
    }

    #[test]
    fn test_path_style_url_with_custom_endpoint() {
        let config = storage_config(Some("http://127.0.0.1:9000"), true);
        assert_eq!(
            build_object_url(&config, "docs", "2024/q1 report.pdf"),
            "http://127.0.0.1:9000/docs/2024/q1%20report.pdf"
        );
    }

    #[test]
    fn test_virtual_hosted_url_with_custom_endpoint() {
        let config = storage_config(Some("https://storage.example.com"), false);
        assert_eq!(
            build_object_url(&config, "docs", "a+b.txt"),
            "https://docs.storage.example.com/a%2Bb.txt"
        );
    }
}
