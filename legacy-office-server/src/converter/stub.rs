//! Test doubles for the converter seam.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Availability, ConversionFailure, ConversionOutcome, Converter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubBehaviour {
    /// Write `<stem>.<format>` containing `converted` into the output dir.
    WriteOutput,
    /// Report a non-zero exit.
    Fail,
    /// Report success with a path that was never written.
    PhantomOutput,
    /// Panic inside the conversion call.
    Panic,
}

#[derive(Debug)]
pub struct StubConverter {
    behaviour: StubBehaviour,
    available: bool,
    calls: Mutex<Vec<(PathBuf, PathBuf, String)>>,
}

impl StubConverter {
    pub fn new(behaviour: StubBehaviour) -> Self {
        Self {
            behaviour,
            available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(StubBehaviour::Fail)
        }
    }

    /// `(input, out_dir, format)` for every `convert` call so far.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Converter for StubConverter {
    async fn convert(&self, input: &Path, out_dir: &Path, format: &str) -> ConversionOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_path_buf(), out_dir.to_path_buf(), format.to_owned()));

        let output = super::soffice::expected_output(input, out_dir, format);
        match self.behaviour {
            StubBehaviour::WriteOutput => {
                tokio::fs::write(&output, b"converted").await.unwrap();
                ConversionOutcome::Converted(output)
            }
            StubBehaviour::Fail => ConversionOutcome::Failed(ConversionFailure::NonZeroExit {
                code: Some(1),
                stderr: "Error: source file could not be loaded".into(),
            }),
            StubBehaviour::PhantomOutput => ConversionOutcome::Converted(output),
            StubBehaviour::Panic => panic!("converter exploded"),
        }
    }

    async fn probe(&self) -> Availability {
        if self.available {
            Availability::Available
        } else {
            Availability::Unavailable("stubbed as unavailable".into())
        }
    }
}

/// Write an executable `sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
