use clap::Parser;
use dotenvy::dotenv;
use axum::body::Body;
use s3_file_gateway::api::middleware::request_id::request_id_middleware;
use s3_file_gateway::api::middleware::trace;
use s3_file_gateway::config::AppConfig;
use s3_file_gateway::infrastructure::storage;
use s3_file_gateway::services::object_service::ObjectService;
use s3_file_gateway::{AppState, create_app};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP listener
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env entries are merged into the process environment before anything reads it
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_file_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting S3 File Gateway...");

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("❌ Invalid configuration: {}", e);
        e
    })?;
    info!(
        "🛡️  Upload limit: {}MB",
        config.max_file_size / 1024 / 1024
    );

    let storage_service = storage::setup_storage(&config.storage).await;
    let objects = Arc::new(ObjectService::new(storage_service));

    let state = AppState { objects, config };

    // Request ids are assigned outside the trace layer so the span can pick them up
    let app = create_app(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::request_span::<Body>)
                .on_response(trace::record_response::<Body>),
        )
        .layer(axum::middleware::from_fn(request_id_middleware));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("✅ Server ready at http://{}", addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped.");
    Ok(())
}

/// Resolves on the first shutdown request: Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "Ctrl+C",
            Err(e) => {
                warn!("Ctrl+C handler unavailable: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let source = tokio::select! {
        source = interrupt => source,
        source = terminate => source,
    };
    info!("🛑 {} received, draining open connections...", source);
}
