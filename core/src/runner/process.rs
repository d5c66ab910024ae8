use std::process::Stdio;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};

use super::exit::normalize_exit;
use super::traits::{RunnerPlugin, RunnerSession};
use super::types::LaunchSpec;

/// Starts the target as a local child process.
///
/// stdin and stdout are piped; stderr goes to the null device so the
/// child's own diagnostics never reach the caller.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RunnerPlugin for ProcessRunner {
    fn name(&self) -> &str {
        "process"
    }

    async fn start_session(&self, spec: &LaunchSpec) -> Result<Box<dyn RunnerSession>> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        spec.env.apply(&mut cmd);

        let child = cmd.spawn()?;
        tracing::debug!(pid = ?child.id(), program = %spec.program, "child spawned");

        Ok(Box::new(ProcessSession { child }))
    }
}

struct ProcessSession {
    child: Child,
}

#[async_trait]
impl RunnerSession for ProcessSession {
    fn stdin(&mut self) -> Option<Box<dyn AsyncWrite + Unpin + Send>> {
        self.child
            .stdin
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncWrite + Unpin + Send>)
    }

    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn wait(&mut self) -> Result<i32> {
        let status = self.child.wait().await?;
        Ok(normalize_exit(status))
    }
}
