use crate::services::storage::{ObjectDownload, StorageError, StorageService};
use std::path::Path;
use std::sync::Arc;

/// Bucket and object operations exposed over HTTP.
///
/// Each call is a single round trip to the object store; nothing is retried
/// or cached here.
pub struct ObjectService {
    storage: Arc<dyn StorageService>,
}

impl ObjectService {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    pub async fn create_bucket(&self, bucket: &str) -> Result<String, StorageError> {
        self.storage.create_bucket(bucket).await?;
        tracing::info!("🪣 Bucket created: {}", bucket);
        Ok(format!("Bucket created: {}", bucket))
    }

    /// Stores the file at `path` under `key`, replacing any object already there.
    pub async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<String, StorageError> {
        self.storage.put_object(bucket, key, path).await?;
        tracing::info!("📤 Uploaded {}/{}", bucket, key);
        Ok(format!("File uploaded: {}", key))
    }

    /// The returned body must be drained by the caller.
    pub async fn download_file(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<ObjectDownload, StorageError> {
        let object = self.storage.get_object(bucket, key).await?;
        tracing::info!(
            "📥 Serving {}/{} ({} bytes)",
            bucket,
            key,
            object
                .content_length
                .map(|len| len.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        Ok(object)
    }

    pub async fn delete_file(&self, bucket: &str, key: &str) -> Result<String, StorageError> {
        self.storage.delete_object(bucket, key).await?;
        tracing::info!("🗑️  Deleted {}/{}", bucket, key);
        Ok(format!("File deleted: {}", key))
    }

    pub fn file_url(&self, bucket: &str, key: &str) -> String {
        self.storage.object_url(bucket, key)
    }
}
