//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::converter::{Converter, SofficeConverter};

/// State shared across all HTTP handlers. Read-only after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// External document converter.
    pub converter: Arc<dyn Converter>,
}

impl AppState {
    pub fn new(config: Config, converter: Arc<dyn Converter>) -> Self {
        Self {
            config: Arc::new(config),
            converter,
        }
    }

    /// State backed by the LibreOffice binary named in `config`.
    pub fn with_soffice(config: Config) -> Self {
        let converter = Arc::new(SofficeConverter::from_config(&config));
        Self::new(config, converter)
    }
}
