use crate::client::route_config::get_public_path;
use crate::dto::MessageResponse;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

pub struct FallbackState {
    pub frontend_dist: Option<PathBuf>,
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(MessageResponse::new("Route not found"))).into_response()
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("json") => "application/json",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

// Only plain relative components; anything else could escape the dist dir.
fn asset_path(dist: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || !relative.components().all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(dist.join(relative))
}

/// Non-API requests: legacy internal paths redirect to their public form,
/// everything else gets the single page app.
pub async fn spa_fallback_handler(
    State(state): State<Arc<FallbackState>>,
    method: Method,
    uri: Uri,
) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") || method != Method::GET {
        return not_found();
    }

    let public = get_public_path(path);
    if public != path {
        let target = match uri.query() {
            Some(query) => format!("{}?{}", public, query),
            None => public,
        };
        debug!("Redirecting {} to {}", path, target);
        return Redirect::permanent(&target).into_response();
    }

    let Some(dist) = state.frontend_dist.as_ref() else {
        return not_found();
    };

    if let Some(asset) = asset_path(dist, path) {
        if let Ok(bytes) = tokio::fs::read(&asset).await {
            return ([(header::CONTENT_TYPE, content_type_for(&asset))], bytes).into_response();
        }
    }

    match tokio::fs::read_to_string(dist.join("index.html")).await {
        Ok(index) => Html(index).into_response(),
        Err(e) => {
            error!("Failed to read SPA index from {}: {}", dist.display(), e);
            not_found()
        }
    }
}
