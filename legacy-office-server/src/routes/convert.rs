//! `POST /convert`: legacy Office upload in, modern Office file out.
//!
//! The upload is staged into a per-request [`ScratchWorkspace`] under a
//! random name, handed to the configured [`Converter`](crate::converter::Converter),
//! and the produced file is returned as an attachment named after the
//! caller's own file. The workspace is removed before the handler returns.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::converter::{ConversionFailure, ConversionOutcome};
use crate::error::ServerError;
use crate::formats::{response_file_name, supported_extensions, LegacyFormat};
use crate::schemas::ConvertUpload;
use crate::state::AppState;
use crate::workspace::ScratchWorkspace;

const FILE_FIELD: &str = "file";

/// Characters left as-is in a `filename*` value; everything else is escaped.
const FILENAME_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

#[derive(OpenApi)]
#[openapi(paths(convert), components(schemas(ConvertUpload)))]
pub struct ConvertApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/convert", post(convert))
}

/// The uploaded file as received.
#[derive(Debug)]
struct Upload {
    file_name: String,
    bytes: Bytes,
}

/// Convert a legacy Office file to its modern equivalent.
///
/// - `.doc` → `.docx`
/// - `.xls` → `.xlsx`
/// - `.ppt` → `.pptx`
#[utoipa::path(
    post,
    path = "/convert",
    tag = "convert",
    request_body(content = ConvertUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Converted file as `application/octet-stream` attachment"),
        (status = 400, description = "Unsupported or missing file extension"),
        (status = 413, description = "Upload too large"),
        (status = 422, description = "No file attached"),
        (status = 500, description = "Conversion failed"),
    )
)]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    // No multipart body at all counts as "no file attached".
    let mut multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection, "request carries no multipart body");
        missing_file()
    })?;
    let upload = read_upload(&mut multipart).await?;
    let format = LegacyFormat::from_file_name(&upload.file_name).ok_or_else(unsupported_format)?;
    debug!(
        file_name = %upload.file_name,
        size_bytes = upload.bytes.len(),
        ?format,
        "conversion request"
    );

    let workspace = ScratchWorkspace::create(state.config.scratch_root.as_deref()).await?;
    let converted = convert_in(&state, &workspace, format, &upload).await;
    workspace.close().await;
    let converted = converted?;

    let file_name = response_file_name(&upload.file_name, format);
    info!(
        file_name = %file_name,
        size_bytes = converted.len(),
        "returning converted file"
    );

    let disposition = HeaderValue::from_str(&attachment_disposition(&file_name))
        .map_err(|e| ServerError::Internal(format!("invalid Content-Disposition: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        converted,
    )
        .into_response())
}

/// Stage, convert and read back the result. Leaves cleanup to the caller.
async fn convert_in(
    state: &AppState,
    workspace: &ScratchWorkspace,
    format: LegacyFormat,
    upload: &Upload,
) -> Result<Bytes, ServerError> {
    let input = workspace
        .stage_input(format.legacy_extension(), &upload.bytes)
        .await?;

    let output = match state
        .converter
        .convert(&input, workspace.path(), format.filter())
        .await
    {
        ConversionOutcome::Converted(path) => path,
        ConversionOutcome::Failed(failure) => return Err(ServerError::ConversionFailed(failure)),
    };

    if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
        return Err(ServerError::ConversionFailed(ConversionFailure::MissingOutput(output)));
    }
    Ok(Bytes::from(tokio::fs::read(&output).await?))
}

/// Take the first `file` field carrying a file name; other fields are ignored.
/// An empty file name means no file was selected.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ServerError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "ignoring multipart field");
            continue;
        }
        let Some(file_name) = field.file_name().filter(|name| !name.is_empty()).map(str::to_owned) else {
            return Err(missing_file());
        };
        let bytes = field.bytes().await?;
        return Ok(Upload { file_name, bytes });
    }
    Err(missing_file())
}

fn missing_file() -> ServerError {
    ServerError::MissingFile(format!("Field required: multipart file field '{FILE_FIELD}'"))
}

fn unsupported_format() -> ServerError {
    ServerError::BadRequest(format!(
        "Unsupported file format. Supported formats: {}",
        supported_extensions().join(", ")
    ))
}

/// `attachment; filename="..."`, or the RFC 5987 `filename*` form when the
/// name needs escaping.
pub fn attachment_disposition(file_name: &str) -> String {
    let encoded = utf8_percent_encode(file_name, FILENAME_SAFE).to_string();
    if encoded == file_name {
        format!("attachment; filename=\"{file_name}\"")
    } else {
        format!("attachment; filename*=utf-8''{encoded}")
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
