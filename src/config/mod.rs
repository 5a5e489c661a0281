use std::env;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Static settings for the object-storage client
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,

    /// Custom endpoint for S3-compatible stores such as MinIO
    pub endpoint_url: Option<String>,

    /// Address buckets as `{endpoint}/{bucket}` instead of `{bucket}.{endpoint}`
    pub force_path_style: bool,
}

/// Process-wide configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,

    /// Maximum upload body size in bytes (default: 256 MB)
    pub max_file_size: usize,
}

const DEFAULT_MAX_FILE_SIZE: usize = 256 * 1024 * 1024;

/// Room for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let storage = StorageConfig {
            access_key: required("AWS_ACCESS_KEY_ID")?,
            secret_key: required("AWS_SECRET_ACCESS_KEY")?,
            region: required("AWS_REGION")?,
            endpoint_url: lookup("S3_ENDPOINT_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            force_path_style: lookup("S3_FORCE_PATH_STYLE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        };

        let max_file_size = match lookup("MAX_FILE_SIZE") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size <= usize::MAX - MULTIPART_OVERHEAD)
                .ok_or(ConfigError::Invalid {
                    name: "MAX_FILE_SIZE",
                    value: v,
                })?,
            None => DEFAULT_MAX_FILE_SIZE,
        };

        Ok(Self {
            storage,
            max_file_size,
        })
    }

    /// Request body limit for uploads: the file plus multipart framing.
    pub fn upload_body_limit(&self) -> usize {
        self.max_file_size.saturating_add(MULTIPART_OVERHEAD)
    }
}
