use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::classify::LineClassifier;
use crate::config::RunnerConfig;
use crate::error::RunnerError;

use super::io_pump;
use super::process::ProcessRunner;
use super::traits::{RunnerPlugin, RunnerSession};
use super::types::{LaunchSpec, SupervisorOutcome};

/// Launches `spec` and relays this process's stdin/stdout through it.
#[tracing::instrument(name = "runner.run_stdio", skip_all, fields(program = %spec.program))]
pub async fn run_stdio(
    spec: &LaunchSpec,
    cfg: &RunnerConfig,
    classifier: Option<LineClassifier>,
) -> Result<SupervisorOutcome, RunnerError> {
    let session = start(&ProcessRunner::new(), spec).await?;

    supervise(
        session,
        tokio::io::stdin(),
        tokio::io::stdout(),
        classifier,
        Duration::from_millis(cfg.drain_timeout_ms),
    )
    .await
}

pub async fn start(
    plugin: &dyn RunnerPlugin,
    spec: &LaunchSpec,
) -> Result<Box<dyn RunnerSession>, RunnerError> {
    plugin.start_session(spec).await.map_err(|e| {
        RunnerError::Spawn(format!("{} ({}): {e}", spec.program, plugin.name()))
    })
}

/// Wires a started session to the caller's streams and waits for it.
///
/// `input` is relayed verbatim into the child's stdin; the child's stdout is
/// relayed to `output`, through `classifier` when one is given. Both relays
/// are started before blocking on the child. Once the child has exited, the
/// output relay gets up to `drain` to reach EOF; the input relay is left
/// behind, since it may be parked on a read that never completes.
pub async fn supervise<I, O>(
    mut session: Box<dyn RunnerSession>,
    input: I,
    output: O,
    classifier: Option<LineClassifier>,
    drain: Duration,
) -> Result<SupervisorOutcome, RunnerError>
where
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin + Send + 'static,
{
    let child_stdin = session
        .stdin()
        .ok_or_else(|| RunnerError::Spawn("no stdin".into()))?;
    let child_stdout = session
        .stdout()
        .ok_or_else(|| RunnerError::Spawn("no stdout".into()))?;

    let in_task = io_pump::spawn_forwarder(input, child_stdin, "stdin", None);
    let out_task =
        io_pump::spawn_forwarder(child_stdout, output, "stdout", classifier.map(Arc::new));

    let exit_code = session.wait().await?;
    tracing::info!(exit_code, "child exited");

    if in_task.is_finished() {
        match in_task.await {
            Ok(Ok(stats)) => tracing::debug!(?stats, "stdin relay finished"),
            Ok(Err(e)) => tracing::debug!(error = %e, "stdin relay stopped"),
            Err(e) => tracing::debug!(error = %e, "stdin relay task failed"),
        }
    }

    let stdout = match tokio::time::timeout(drain, out_task).await {
        Ok(Ok(Ok(stats))) => {
            tracing::debug!(?stats, "stdout relay finished");
            Some(stats)
        }
        Ok(Ok(Err(e))) => {
            tracing::debug!(error = %e, "stdout relay stopped");
            None
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "stdout relay task failed");
            None
        }
        Err(_) => {
            tracing::debug!(
                drain_ms = drain.as_millis() as u64,
                "stdout relay still open after drain window"
            );
            None
        }
    };

    Ok(SupervisorOutcome { exit_code, stdout })
}
