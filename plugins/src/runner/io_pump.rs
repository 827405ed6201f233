use std::sync::Arc;

use ccbuild_core::api::{ExecError, RingBytes};
use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
pub enum LineStream {
    Stdout,
    Stderr,
}

impl LineStream {
    fn label(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Copy everything from `rd` into `ring` until EOF, tracing each complete
/// line. Returns the total number of bytes read.
pub fn pump<R>(rd: R, ring: Arc<RingBytes>, stream: LineStream) -> JoinHandle<Result<u64, ExecError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(pump_inner(rd, ring, stream))
}

async fn pump_inner<R>(mut rd: R, ring: Arc<RingBytes>, stream: LineStream) -> Result<u64, ExecError>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    let mut buf = vec![0u8; 16 * 1024];
    let mut total = 0u64;
    let mut lines = LineBuffer::new(MAX_LINE_BYTES);

    loop {
        let n = rd
            .read(&mut buf)
            .await
            .map_err(|e| ExecError::Io(format!("{} read failed: {}", stream.label(), e)))?;
        if n == 0 {
            break;
        }

        ring.push(&buf[..n]);
        total += n as u64;
        lines.push(&buf[..n], |line| trace_line(stream, line));
    }

    lines.finish(|line| trace_line(stream, line));
    Ok(total)
}

/// Longest line held back waiting for a newline; longer runs are emitted in
/// pieces of at least this size.
const MAX_LINE_BYTES: usize = 64 * 1024;

/// Splits a byte stream into lines without `\n` / `\r\n` terminators. Only
/// the newly pushed bytes are scanned, and the pending partial line is
/// bounded by `max`.
struct LineBuffer {
    pending: Vec<u8>,
    max: usize,
}

impl LineBuffer {
    fn new(max: usize) -> Self {
        Self {
            pending: Vec::with_capacity(8 * 1024),
            max,
        }
    }

    fn push(&mut self, mut chunk: &[u8], mut emit: impl FnMut(&[u8])) {
        while let Some(pos) = chunk.iter().position(|&b| b == b'\n') {
            self.pending.extend_from_slice(&chunk[..pos]);
            trim_cr(&mut self.pending);
            emit(&self.pending);
            self.pending.clear();
            chunk = &chunk[pos + 1..];
        }
        self.pending.extend_from_slice(chunk);
        if self.pending.len() >= self.max {
            emit(&self.pending);
            self.pending.clear();
        }
    }

    /// Emit the trailing partial line, if any.
    fn finish(&mut self, mut emit: impl FnMut(&[u8])) {
        trim_cr(&mut self.pending);
        if !self.pending.is_empty() {
            emit(&self.pending);
        }
        self.pending.clear();
    }
}

fn trace_line(stream: LineStream, line: &[u8]) {
    tracing::trace!(
        target: "ccbuild.process",
        stream = stream.label(),
        line = %String::from_utf8_lossy(line)
    );
}

fn trim_cr(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
}
