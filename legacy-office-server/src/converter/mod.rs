//! External document converter seam.
//!
//! [`Converter`] is what the HTTP layer talks to. The production
//! implementation, [`soffice::SofficeConverter`], shells out to a headless
//! LibreOffice binary; tests substitute a stub.

pub mod probe;
pub mod soffice;

#[cfg(test)]
pub mod stub;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use soffice::SofficeConverter;

/// Result of one conversion attempt.
///
/// Every way the external tool can fail collapses into [`ConversionOutcome::Failed`];
/// the [`ConversionFailure`] keeps the category for logs only.
#[derive(Debug)]
pub enum ConversionOutcome {
    /// The converted file, verified to exist in the output directory.
    Converted(PathBuf),
    Failed(ConversionFailure),
}

#[derive(Debug, Error)]
pub enum ConversionFailure {
    #[error("failed to start converter: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed waiting for converter: {0}")]
    Wait(#[source] std::io::Error),

    #[error("converter timed out after {0:?}")]
    TimedOut(Duration),

    #[error("converter exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("converter reported success but {0} does not exist")]
    MissingOutput(PathBuf),
}

/// Whether the external tool is installed and responding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// Reason is for logs; callers only see "unavailable".
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

#[async_trait]
pub trait Converter: Send + Sync + std::fmt::Debug {
    /// Convert `input` to `format`, writing the result into `out_dir`.
    async fn convert(&self, input: &Path, out_dir: &Path, format: &str) -> ConversionOutcome;

    /// Lightweight liveness check of the external tool. No side effects.
    async fn probe(&self) -> Availability;
}
