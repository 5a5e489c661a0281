//! Exercises the real S3 adapter against a local MinIO
//! (`minio server` on 127.0.0.1:9000 with the default minioadmin credentials).
//! Run with `cargo test -- --ignored`.

use s3_file_gateway::config::StorageConfig;
use s3_file_gateway::infrastructure::storage::setup_storage;
use s3_file_gateway::services::storage::{StorageError, StorageService};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

fn minio_config() -> StorageConfig {
    StorageConfig {
        access_key: "minioadmin".to_string(),
        secret_key: "minioadmin".to_string(),
        region: "us-east-1".to_string(),
        endpoint_url: Some("http://127.0.0.1:9000".to_string()),
        force_path_style: true,
    }
}

#[tokio::test]
#[ignore = "requires a running MinIO at 127.0.0.1:9000"]
async fn test_s3_object_lifecycle() {
    let storage = setup_storage(&minio_config()).await;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let bucket = format!("gateway-test-{}", nanos);

    storage.create_bucket(&bucket).await.unwrap();
    let err = storage.create_bucket(&bucket).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)), "got {:?}", err);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[b'X'; 1024]).unwrap();
    file.flush().unwrap();

    storage
        .put_object(&bucket, "report.pdf", file.path())
        .await
        .unwrap();

    let object = storage.get_object(&bucket, "report.pdf").await.unwrap();
    assert_eq!(object.content_length, Some(1024));
    let data = object.body.collect().await.unwrap().into_bytes();
    assert_eq!(data.as_ref(), &[b'X'; 1024][..]);

    storage.delete_object(&bucket, "report.pdf").await.unwrap();
    storage.delete_object(&bucket, "never-there.txt").await.unwrap();

    let err = storage
        .get_object(&bucket, "report.pdf")
        .await
        .err()
        .expect("object should be gone");
    assert!(matches!(err, StorageError::NotFound(_)), "got {:?}", err);

    assert_eq!(
        storage.object_url(&bucket, "report.pdf"),
        format!("http://127.0.0.1:9000/{}/report.pdf", bucket)
    );
}

#[tokio::test]
#[ignore = "requires a running MinIO at 127.0.0.1:9000"]
async fn test_put_into_missing_bucket_is_not_found() {
    let storage = setup_storage(&minio_config()).await;

    let file = tempfile::NamedTempFile::new().unwrap();
    let err = storage
        .put_object("bucket-that-does-not-exist-4711", "a.txt", file.path())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_missing_local_file_is_local_io() {
    let storage = setup_storage(&minio_config()).await;

    let err = storage
        .put_object("any", "a.txt", std::path::Path::new("/definitely/not/here.bin"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::LocalIo(_)), "got {:?}", err);
}
