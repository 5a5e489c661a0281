pub mod download;
pub mod manage;
pub mod types;
pub mod upload;

// Re-export all types
pub use types::*;

// Re-export all handlers
pub use download::download_file;
pub use manage::{create_bucket, delete_file, file_url};
pub use upload::upload_file;
