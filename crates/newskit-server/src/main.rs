//! Newskit HTTP API Server
//!
//! Provides REST API endpoints for template lookup and preview archive
//! delivery for the Newskit Apple News export pipeline.

use axum::{Router, response::Json, routing::get};
use newskit::{
    ContentSource, ExportDefinition, ExtensionInfo, ExtensionRegistry, FieldNormalizer,
    FileContentSource, FileTemplateStorage, PreviewBuilder, PreviewService, SourceDefinition,
    TemplateSelection, export_id,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod error;
mod models;
mod routes;

use config::ServerConfig;
use error::Result;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub selection: TemplateSelection,
    pub content: Arc<dyn ContentSource>,
    pub preview: Arc<PreviewService>,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "newskit_server=debug,tower_http=debug".to_string()),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    info!(
        "Starting Newskit Server on {}:{}",
        config.host, config.port
    );

    let template_storage = FileTemplateStorage::new(&config.templates_dir).await?;
    let content_source = FileContentSource::new(&config.content_dir).await?;

    // Register the built-in extension and resolve the export flow the
    // preview endpoint serves
    let mut extensions = ExtensionRegistry::new();
    extensions.register("newskit", article_extension())?;

    let article_export = export_id("newskit", "article");
    let export = extensions.export(&article_export)?;
    info!("Serving export flow {} ({})", article_export, export.name);

    let preview = PreviewService::new(
        export.normalizer.clone(),
        PreviewBuilder::new(&config.preview_dir),
    );

    // Create application state
    let state = AppState {
        selection: TemplateSelection::new(Arc::new(template_storage)),
        content: Arc::new(content_source),
        preview: Arc::new(preview),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

    info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Everything the built-in extension contributes to the pipeline
fn article_extension() -> ExtensionInfo {
    ExtensionInfo::new()
        .with_export(
            "article",
            ExportDefinition::new(
                "Articles",
                "Export article nodes as publishable documents",
                Arc::new(FieldNormalizer::new()),
            ),
        )
        .with_source(
            "node",
            SourceDefinition::new("Nodes", "File-backed editorial content entities"),
        )
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", api_routes())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", routes::templates::router())
        .nest("/preview", routes::preview::router())
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "newskit-server",
        "version": newskit::version(),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
