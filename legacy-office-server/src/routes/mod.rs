//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection, panic capture)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `CONVERTER_ENABLE_SWAGGER=false`)
//! - Status / health routes
//! - The `/convert` upload route

mod convert;
pub mod doc;
mod health;

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::fault_message;
use crate::middleware::{cors, trace};
use crate::state::AppState;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(health::router())
        .merge(convert::router())
        // Multipart framing overhead on top of the file itself.
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes().saturating_add(64 * 1024),
        ));

    let mut app = Router::new().merge(api_router);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Each `.layer` wraps the ones before it: panic capture sits closest
        // to the handlers and tracing sees every request first.
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors::cors_layer(state.clone()))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

/// Turn a handler panic into the same 500 shape as any other unexpected fault.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "handler panicked".to_owned()
    };
    error!(panic = %message, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": fault_message(&message) })),
    )
        .into_response()
}
