use crate::state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub fn cors_layer(state: Arc<AppState>) -> CorsLayer {
    let permissive = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any)
        .expose_headers([axum::http::header::CONTENT_DISPOSITION]);

    let Some(origins_str) = &state.config.cors_allowed_origins else {
        // Wildcard – suitable for development; set CONVERTER_CORS_ORIGINS in production.
        return permissive;
    };

    let origins: Vec<axum::http::HeaderValue> = origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        permissive
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_headers(Any)
            .allow_methods(Any)
            .expose_headers([axum::http::header::CONTENT_DISPOSITION])
    }
}
