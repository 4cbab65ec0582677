//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for legacy-office-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// Executable name or path of the external converter (default: `"soffice"`).
    pub libreoffice_binary: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Wall-clock limit for a single conversion subprocess.
    pub convert_timeout: Duration,

    /// Wall-clock limit for the availability probe.
    pub probe_timeout: Duration,

    /// Largest accepted upload, in MiB.
    pub max_upload_size_mb: usize,

    /// Root directory for per-request scratch workspaces.
    /// `None` means the system temp directory.
    pub scratch_root: Option<PathBuf>,

    /// Comma-separated list of allowed CORS origins. `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve `/swagger-ui` and `/api-docs/openapi.json`.
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_address: env_or(&lookup, "CONVERTER_BIND", "0.0.0.0:8000"),
            libreoffice_binary: env_or(&lookup, "LIBREOFFICE_BINARY", "soffice"),
            log_level: env_or(&lookup, "CONVERTER_LOG", "info"),
            log_json: parse_bool(&lookup, "CONVERTER_LOG_JSON", false),
            convert_timeout: Duration::from_secs(parse_env(
                &lookup,
                "CONVERTER_CONVERT_TIMEOUT_SECS",
                60,
            )),
            probe_timeout: Duration::from_secs(parse_env(
                &lookup,
                "CONVERTER_PROBE_TIMEOUT_SECS",
                5,
            )),
            max_upload_size_mb: parse_env(&lookup, "CONVERTER_MAX_UPLOAD_SIZE_MB", 100),
            scratch_root: lookup("CONVERTER_SCRATCH_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            cors_allowed_origins: lookup("CONVERTER_CORS_ORIGINS").filter(|v| !v.trim().is_empty()),
            enable_swagger: parse_bool(&lookup, "CONVERTER_ENABLE_SWAGGER", true),
        }
    }

    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
