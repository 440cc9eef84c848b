//! Static file serving for the frontend bundle, uploaded emoticons and the
//! operator's `custom_public` directory.

use crate::config::Config;
use crate::constants::INDEX_FILE;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path;
use std::sync::Arc;
use tower::{Layer, ServiceExt};
use tower_http::{
    services::{ServeDir, ServeFile},
    set_header::{SetResponseHeader, SetResponseHeaderLayer},
};

const NO_CACHE: &str = "no-cache";

/// Web root handler with history-mode fallback.
///
/// Paths that do not name a file get `index.html` so the client-side router
/// can resolve them. Every other status from the file service is returned
/// as is.
pub async fn spa(State(config): State<Arc<Config>>, request: Request) -> Response {
    let path = request.uri().path();
    if escapes_root(path) {
        tracing::warn!("Rejected static path outside web root: {}", path);
        return StatusCode::FORBIDDEN.into_response();
    }

    let method = request.method().clone();
    let headers = request.headers().clone();

    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        return serve_index(&config.web_root, method, headers).await;
    }

    // Directories are not served, and must not redirect into the fallback
    let is_dir = tokio::fs::metadata(config.web_root.join(relative))
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if is_dir {
        return StatusCode::FORBIDDEN.into_response();
    }

    let response = match ServeDir::new(&config.web_root).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        return serve_index(&config.web_root, method, headers).await;
    }

    response
}

async fn serve_index(web_root: &Path, method: Method, headers: HeaderMap) -> Response {
    let mut request = Request::new(Body::empty());
    *request.method_mut() = method;
    *request.headers_mut() = headers;

    let mut response = match ServeFile::new(web_root.join(INDEX_FILE)).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    // Keep browsers from pinning an old bundle after an update
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));

    response
}

/// Files under `dir` with every response marked `Cache-Control: no-cache`
pub fn no_cache_dir(dir: impl AsRef<Path>) -> SetResponseHeader<ServeDir, HeaderValue> {
    SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE))
        .layer(ServeDir::new(dir))
}

/// True when any segment of a request path is `..`, percent-encoded or not.
fn escapes_root(path: &str) -> bool {
    path.split(['/', '\\'])
        .map(|segment| segment.to_ascii_lowercase().replace("%2e", "."))
        .any(|segment| segment == "..")
}
