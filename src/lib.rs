use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod static_files;

use config::Config;
use constants::{EMOTICON_BASE_URL, MAX_REQUEST_BODY_SIZE};

/// Build the full router. Catch-all static routes are registered last.
pub fn app(config: Config) -> Router {
    let upload_dir = config.upload_dir();
    let custom_public_dir = config.custom_public_dir();
    let app_state = Arc::new(config);

    Router::new()
        // API routes
        .route("/api/server_info", get(handlers::server_info))
        .route("/api/endpoints", get(handlers::endpoints))
        .route("/api/ping", get(handlers::ping))
        .route("/api/emoticon", post(handlers::upload_emoticon))
        .route("/api/emoticons", get(handlers::list_emoticons))
        // Static files
        .nest_service(EMOTICON_BASE_URL, ServeDir::new(upload_dir))
        .nest_service("/custom_public", static_files::no_cache_dir(custom_public_dir))
        // API docs
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", handlers::ApiDoc::openapi()))
        // Frontend, history-mode routing
        .fallback(static_files::spa)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
