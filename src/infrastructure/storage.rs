use crate::config::StorageConfig;
use crate::services::storage::S3StorageService;
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &StorageConfig) -> Arc<S3StorageService> {
    match config.endpoint_url.as_deref() {
        Some(endpoint) => info!(
            "☁️  S3 Storage: {} (Region: {}, Path style: {})",
            endpoint, config.region, config.force_path_style
        ),
        None => info!("☁️  S3 Storage: AWS (Region: {})", config.region),
    }

    let mut loader = aws_config::from_env()
        .region(Region::new(config.region.clone()))
        .credentials_provider(Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "static",
        ));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.force_path_style)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(S3StorageService::new(s3_client, config.clone()))
}
