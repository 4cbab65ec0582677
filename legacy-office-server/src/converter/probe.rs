//! Availability probe for the external converter binary.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::Availability;

/// Run `<binary> --help` and report whether it started, finished within
/// `limit` and exited 0. Anything else is [`Availability::Unavailable`].
pub async fn probe_binary(binary: &str, limit: Duration) -> Availability {
    let mut cmd = Command::new(binary);
    cmd.arg("--help")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let availability = match timeout(limit, cmd.output()).await {
        Err(_) => Availability::Unavailable(format!("`{binary} --help` timed out after {limit:?}")),
        Ok(Err(e)) => Availability::Unavailable(format!("failed to run `{binary}`: {e}")),
        Ok(Ok(output)) if output.status.success() => Availability::Available,
        Ok(Ok(output)) => Availability::Unavailable(format!(
            "`{binary} --help` exited with status {:?}",
            output.status.code()
        )),
    };

    match &availability {
        Availability::Available => debug!(binary, "converter binary is available"),
        Availability::Unavailable(reason) => warn!(binary, %reason, "converter binary not available"),
    }
    availability
}

#[cfg(all(test, unix))]
mod test {
    use super::*;

    const LIMIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn zero_exit_is_available() {
        assert_eq!(probe_binary("true", LIMIT).await, Availability::Available);
    }

    #[tokio::test]
    async fn non_zero_exit_is_unavailable() {
        assert!(!probe_binary("false", LIMIT).await.is_available());
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let availability = probe_binary("definitely-not-an-office-suite-7f3a", LIMIT).await;
        match availability {
            Availability::Unavailable(reason) => assert!(reason.contains("failed to run")),
            Availability::Available => panic!("missing binary reported as available"),
        }
    }

    #[tokio::test]
    async fn slow_binary_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let script = crate::converter::stub::write_script(dir.path(), "slow", "exec sleep 10\n");
        let availability = probe_binary(script.to_str().unwrap(), Duration::from_millis(200)).await;
        match availability {
            Availability::Unavailable(reason) => assert!(reason.contains("timed out")),
            Availability::Available => panic!("slow binary reported as available"),
        }
    }
}
