//! Headless LibreOffice invocation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::probe::probe_binary;
use super::{Availability, ConversionFailure, ConversionOutcome, Converter};
use crate::config::Config;

/// Runs `<binary> --headless --convert-to <format> --outdir <dir> <input>`.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    binary: String,
    convert_timeout: Duration,
    probe_timeout: Duration,
}

impl SofficeConverter {
    pub fn new(binary: impl Into<String>, convert_timeout: Duration, probe_timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            convert_timeout,
            probe_timeout,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.libreoffice_binary, cfg.convert_timeout, cfg.probe_timeout)
    }

    async fn run(&self, input: &Path, out_dir: &Path, format: &str) -> Result<PathBuf, ConversionFailure> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(convert_args(input, out_dir, format))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(binary = %self.binary, input = %input.display(), format, "spawning converter");
        let child = cmd.spawn().map_err(ConversionFailure::Spawn)?;

        // Dropping the wait on timeout kills the child.
        let output = timeout(self.convert_timeout, child.wait_with_output())
            .await
            .map_err(|_| ConversionFailure::TimedOut(self.convert_timeout))?
            .map_err(ConversionFailure::Wait)?;

        if !output.status.success() {
            return Err(ConversionFailure::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let expected = expected_output(input, out_dir, format);
        if tokio::fs::try_exists(&expected).await.unwrap_or(false) {
            Ok(expected)
        } else {
            Err(ConversionFailure::MissingOutput(expected))
        }
    }
}

#[async_trait]
impl Converter for SofficeConverter {
    async fn convert(&self, input: &Path, out_dir: &Path, format: &str) -> ConversionOutcome {
        match self.run(input, out_dir, format).await {
            Ok(path) => {
                info!(output = %path.display(), format, "conversion finished");
                ConversionOutcome::Converted(path)
            }
            Err(failure) => {
                warn!(binary = %self.binary, input = %input.display(), error = %failure, "conversion failed");
                ConversionOutcome::Failed(failure)
            }
        }
    }

    async fn probe(&self) -> Availability {
        probe_binary(&self.binary, self.probe_timeout).await
    }
}

/// Arguments after the binary name, in the order LibreOffice expects.
pub fn convert_args(input: &Path, out_dir: &Path, format: &str) -> Vec<OsString> {
    vec![
        "--headless".into(),
        "--convert-to".into(),
        format.into(),
        "--outdir".into(),
        out_dir.as_os_str().to_owned(),
        input.as_os_str().to_owned(),
    ]
}

/// `<out_dir>/<input base name>.<format>`: where LibreOffice deposits its output.
pub fn expected_output(input: &Path, out_dir: &Path, format: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(format);
    out_dir.join(name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn args_follow_headless_convert_layout() {
        let args = convert_args(Path::new("/tmp/w/abc.doc"), Path::new("/tmp/w"), "docx");
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            ["--headless", "--convert-to", "docx", "--outdir", "/tmp/w", "/tmp/w/abc.doc"]
        );
    }

    #[test]
    fn expected_output_uses_input_stem() {
        assert_eq!(
            expected_output(Path::new("/in/4f1c.xls"), Path::new("/out"), "xlsx"),
            PathBuf::from("/out/4f1c.xlsx")
        );
    }

    #[test]
    fn from_config_takes_binary_and_timeouts() {
        let cfg = Config::default();
        let converter = SofficeConverter::from_config(&cfg);
        assert_eq!(converter.binary, "soffice");
        assert_eq!(converter.convert_timeout, Duration::from_secs(60));
        assert_eq!(converter.probe_timeout, Duration::from_secs(5));
    }
}

#[cfg(all(test, unix))]
mod process_test {
    use super::*;
    use crate::converter::stub::write_script;
    use tracing_test::traced_test;

    const CONVERT_LIMIT: Duration = Duration::from_secs(10);
    const PROBE_LIMIT: Duration = Duration::from_secs(5);

    /// Mimics soffice: writes `<outdir>/<stem>.<format>`.
    const FAKE_SOFFICE: &str = r#"fmt="$3"
outdir="$5"
input="$6"
name=$(basename "$input")
printf 'converted' > "$outdir/${name%.*}.$fmt"
"#;

    fn staged_input(dir: &Path) -> PathBuf {
        let input = dir.join("0c9e.doc");
        std::fs::write(&input, b"legacy bytes").unwrap();
        input
    }

    #[tokio::test]
    async fn produces_the_expected_file() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = write_script(bin.path(), "soffice", FAKE_SOFFICE);
        let converter = SofficeConverter::new(script.to_str().unwrap(), CONVERT_LIMIT, PROBE_LIMIT);

        let input = staged_input(work.path());
        match converter.convert(&input, work.path(), "docx").await {
            ConversionOutcome::Converted(path) => {
                assert_eq!(path, work.path().join("0c9e.docx"));
                assert_eq!(std::fs::read(&path).unwrap(), b"converted");
            }
            ConversionOutcome::Failed(e) => panic!("unexpected failure: {e}"),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn non_zero_exit_fails_and_logs() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = write_script(bin.path(), "soffice", "echo 'source file could not be loaded' >&2\nexit 1\n");
        let converter = SofficeConverter::new(script.to_str().unwrap(), CONVERT_LIMIT, PROBE_LIMIT);

        let input = staged_input(work.path());
        match converter.convert(&input, work.path(), "docx").await {
            ConversionOutcome::Failed(ConversionFailure::NonZeroExit { code, stderr }) => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "source file could not be loaded");
            }
            other => panic!("expected non-zero exit, got {other:?}"),
        }
        assert!(logs_contain("conversion failed"));
    }

    #[tokio::test]
    async fn zero_exit_without_output_fails() {
        let work = tempfile::tempdir().unwrap();
        let converter = SofficeConverter::new("true", CONVERT_LIMIT, PROBE_LIMIT);

        let input = staged_input(work.path());
        match converter.convert(&input, work.path(), "docx").await {
            ConversionOutcome::Failed(ConversionFailure::MissingOutput(path)) => {
                assert_eq!(path, work.path().join("0c9e.docx"));
            }
            other => panic!("expected missing output, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_fails_without_panicking() {
        let work = tempfile::tempdir().unwrap();
        let converter =
            SofficeConverter::new("definitely-not-an-office-suite-7f3a", CONVERT_LIMIT, PROBE_LIMIT);

        let input = staged_input(work.path());
        assert!(matches!(
            converter.convert(&input, work.path(), "docx").await,
            ConversionOutcome::Failed(ConversionFailure::Spawn(_))
        ));
    }

    #[tokio::test]
    async fn slow_converter_times_out() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = write_script(bin.path(), "soffice", "exec sleep 10\n");
        let limit = Duration::from_millis(200);
        let converter = SofficeConverter::new(script.to_str().unwrap(), limit, PROBE_LIMIT);

        let input = staged_input(work.path());
        let started = std::time::Instant::now();
        let outcome = converter.convert(&input, work.path(), "docx").await;
        assert!(started.elapsed() < Duration::from_secs(5));
        match outcome {
            ConversionOutcome::Failed(ConversionFailure::TimedOut(d)) => assert_eq!(d, limit),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_uses_the_configured_binary() {
        assert!(SofficeConverter::new("true", CONVERT_LIMIT, PROBE_LIMIT).probe().await.is_available());
        assert!(!SofficeConverter::new("false", CONVERT_LIMIT, PROBE_LIMIT).probe().await.is_available());
    }
}
