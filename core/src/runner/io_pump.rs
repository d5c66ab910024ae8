use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

use crate::classify::LineClassifier;
use crate::error::RunnerError;

use super::types::ForwardStats;

/// Runs [`forward_lines`] on its own task.
pub fn spawn_forwarder<R, W>(
    rd: R,
    wr: W,
    label: &'static str,
    classifier: Option<Arc<LineClassifier>>,
) -> JoinHandle<Result<ForwardStats, RunnerError>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(forward_lines(rd, wr, label, classifier))
}

/// Copies `rd` to `wr` one line at a time until `rd` reaches EOF.
///
/// Each kept line is written byte-for-byte, terminator included, and flushed
/// before the next read. With a classifier, lines it rejects are skipped
/// whole. A trailing line without `\n` is treated like any other line. On EOF
/// the writer is shut down so the peer sees end-of-stream too.
pub async fn forward_lines<R, W>(
    rd: R,
    mut wr: W,
    label: &'static str,
    classifier: Option<Arc<LineClassifier>>,
) -> Result<ForwardStats, RunnerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let io_err = |source: std::io::Error| RunnerError::StreamIo {
        stream: label,
        source,
    };

    let mut reader = BufReader::new(rd);
    let mut line_buf: Vec<u8> = Vec::with_capacity(8 * 1024);
    let mut stats = ForwardStats::default();

    loop {
        line_buf.clear();
        let n = reader.read_until(b'\n', &mut line_buf).await.map_err(io_err)?;
        if n == 0 {
            break;
        }

        if let Some(classifier) = classifier.as_deref() {
            let text = valid_utf8(trim_newline(&line_buf));
            if !classifier.classify(&text) {
                stats.lines_dropped += 1;
                tracing::trace!(stream = label, line = %text, "dropped");
                continue;
            }
        }

        wr.write_all(&line_buf).await.map_err(io_err)?;
        wr.flush().await.map_err(io_err)?;
        stats.lines_forwarded += 1;
        stats.bytes_forwarded += line_buf.len() as u64;
    }

    wr.shutdown().await.map_err(io_err)?;
    Ok(stats)
}

fn trim_newline(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Text the classifier sees: invalid UTF-8 sequences are skipped, not
/// replaced, so a line of garbage bytes reads as blank.
fn valid_utf8(buf: &[u8]) -> String {
    buf.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
