use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use super::types::LaunchSpec;

#[async_trait]
pub trait RunnerSession: Send {
    fn stdin(&mut self) -> Option<Box<dyn AsyncWrite + Unpin + Send>>;
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    /// Resolves with the child's exit code once it terminates.
    async fn wait(&mut self) -> anyhow::Result<i32>;
}

#[async_trait]
pub trait RunnerPlugin: Send + Sync {
    fn name(&self) -> &str;
    async fn start_session(&self, spec: &LaunchSpec) -> anyhow::Result<Box<dyn RunnerSession>>;
}
