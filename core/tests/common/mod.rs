use async_trait::async_trait;
use sieve_core::runner::RunnerSession;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// In-memory stand-in for a child process.
///
/// The fake child writes `banner` to its stdout, then echoes every line it
/// receives on stdin. When its stdin closes it closes stdout and exits with
/// `exit_code`.
pub struct ScriptedSession {
    stdin: Option<DuplexStream>,
    stdout: Option<DuplexStream>,
    exited: Option<oneshot::Receiver<i32>>,
}

impl ScriptedSession {
    pub fn start(banner: &[&str], exit_code: i32) -> Box<dyn RunnerSession> {
        let (stdin_w, child_in) = tokio::io::duplex(4096);
        let (mut child_out, stdout_r) = tokio::io::duplex(4096);
        let (tx, rx) = oneshot::channel();

        let banner: Vec<String> = banner.iter().map(|l| format!("{l}\n")).collect();
        tokio::spawn(async move {
            for line in banner {
                child_out.write_all(line.as_bytes()).await.unwrap();
            }
            let mut lines = BufReader::new(child_in).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                child_out.write_all(format!("{line}\n").as_bytes()).await.unwrap();
            }
            drop(child_out);
            let _ = tx.send(exit_code);
        });

        Box::new(Self {
            stdin: Some(stdin_w),
            stdout: Some(stdout_r),
            exited: Some(rx),
        })
    }
}

#[async_trait]
impl RunnerSession for ScriptedSession {
    fn stdin(&mut self) -> Option<Box<dyn AsyncWrite + Unpin + Send>> {
        self.stdin
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncWrite + Unpin + Send>)
    }

    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn wait(&mut self) -> anyhow::Result<i32> {
        let rx = self
            .exited
            .take()
            .ok_or_else(|| anyhow::anyhow!("already waited"))?;
        Ok(rx.await?)
    }
}

/// A writer for the supervisor plus a task collecting everything written to it.
pub fn capture() -> (DuplexStream, JoinHandle<Vec<u8>>) {
    let (wr, mut rd) = tokio::io::duplex(64 * 1024);
    let collected = tokio::spawn(async move {
        let mut out = Vec::new();
        rd.read_to_end(&mut out).await.unwrap();
        out
    });
    (wr, collected)
}
