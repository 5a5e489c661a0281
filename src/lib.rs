pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::services::object_service::ObjectService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::objects::upload::upload_file,
        api::handlers::objects::download::download_file,
        api::handlers::objects::manage::delete_file,
        api::handlers::objects::manage::create_bucket,
        api::handlers::objects::manage::file_url,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::objects::UploadForm,
            api::handlers::health::HealthResponse,
            models::S3File,
        )
    ),
    tags(
        (name = "objects", description = "Object upload, download and deletion"),
        (name = "buckets", description = "Bucket management"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub objects: Arc<ObjectService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let s3_routes = Router::new()
        .route(
            "/upload",
            post(api::handlers::objects::upload_file)
                .layer(DefaultBodyLimit::max(state.config.upload_body_limit())),
        )
        .route(
            "/download/:bucketName/:fileName",
            get(api::handlers::objects::download_file),
        )
        .route(
            "/delete/:bucketName/:fileName",
            delete(api::handlers::objects::delete_file),
        )
        .route(
            "/create-bucket/:bucketName",
            post(api::handlers::objects::create_bucket),
        )
        .route(
            "/url/:bucketName/:fileName",
            get(api::handlers::objects::file_url),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .nest("/api/s3", s3_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}
