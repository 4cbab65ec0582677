//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a `{"detail": ...}` JSON body with an appropriate status code.
//!
//! Conversion failures are logged with full detail, but the caller only gets
//! a generic message: stderr from the external tool stays in the logs.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::converter::ConversionFailure;

pub const CONVERSION_FAILED: &str = "Conversion failed. Please check if the file is valid.";
pub const UNAVAILABLE_REASON: &str = "LibreOffice binary not responding";

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid request (e.g. unsupported extension).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The multipart form carried no usable `file` field.
    #[error("missing file: {0}")]
    MissingFile(String),

    /// The multipart body could not be read.
    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// The external converter did not produce a file.
    #[error("conversion failed: {0}")]
    ConversionFailed(#[source] ConversionFailure),

    /// The external converter is not installed or not responding.
    #[error("converter unavailable")]
    Unavailable,

    /// Filesystem fault while staging or reading back files.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// An unclassified internal server error.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, Value::from(m.as_str())),
            ServerError::MissingFile(m) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Value::from(m.as_str()))
            }
            ServerError::Multipart(e) => {
                warn!(error = %e, "rejected multipart body");
                (e.status(), Value::from(e.body_text()))
            }

            ServerError::ConversionFailed(failure) => {
                error!(error = %failure, "conversion failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(CONVERSION_FAILED))
            }
            ServerError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "status": "unhealthy", "reason": UNAVAILABLE_REASON }),
            ),

            // Unexpected faults: the description is part of the contract.
            ServerError::Io(_) | ServerError::Internal(_) => {
                error!(error = %self, "unexpected fault while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(fault_message(&self)))
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(format!("{e:#}"))
    }
}

/// Body text for faults caught at the request boundary.
pub fn fault_message(fault: &dyn std::fmt::Display) -> String {
    format!("An error occurred: {fault}")
}
