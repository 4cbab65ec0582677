use crate::routes::{convert, health};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Legacy Office Converter",
        description = "Converts legacy Office files to modern formats.",
        version = "1.0.0",
    ),
    tags(
        (name = "health", description = "Service status and liveness"),
        (name = "convert", description = "Legacy Office conversion"),
    )
)]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(convert::ConvertApi::openapi());
    root
}
