//! Running an external collaborator process with a deadline

use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Why a collaborator run produced no output
#[derive(Debug)]
pub(crate) enum RunFailure {
    Spawn(io::Error),
    Wait(io::Error),
    Timeout,
}

/// Run `program` without a shell, optionally feeding `input` on stdin.
///
/// The child is killed if the deadline passes. A non-zero exit is not a failure here;
/// the caller inspects `Output::status`.
pub(crate) async fn run_with_timeout(
    program: &str,
    args: &[String],
    input: Option<Vec<u8>>,
    timeout: Duration,
) -> Result<Output, RunFailure> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(RunFailure::Spawn)?;

    let stdin = child.stdin.take();
    let feed = async move {
        if let (Some(mut stdin), Some(bytes)) = (stdin, input) {
            stdin.write_all(&bytes).await?;
            stdin.shutdown().await?;
        }
        Ok::<(), io::Error>(())
    };

    let run = async {
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        if let Err(e) = fed
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            tracing::debug!("Failed to write collaborator stdin: {}", e);
        }
        output
    };

    match tokio::time::timeout(timeout, run).await {
        Ok(output) => output.map_err(RunFailure::Wait),
        Err(_) => Err(RunFailure::Timeout),
    }
}

/// Last stderr line worth showing in a diagnostic
pub(crate) fn stderr_summary(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "no stderr output".to_string()
    } else {
        trimmed.lines().last().unwrap_or(trimmed).to_string()
    }
}
