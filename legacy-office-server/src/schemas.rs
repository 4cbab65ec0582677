//! Request / response bodies shared by the routes and the OpenAPI document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `GET /` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// `"healthy"` when the converter binary responds, otherwise `"unhealthy"`.
    pub status: String,
    pub service: String,
    /// Accepted legacy extensions, e.g. `".doc"`.
    pub supported_formats: Vec<String>,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// `POST /convert` multipart form.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ConvertUpload {
    /// Legacy Office file (`.doc`, `.xls` or `.ppt`).
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
