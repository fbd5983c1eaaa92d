//! Line framing and the read loop over the streamed body.

use std::ops::ControlFlow;

use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::event::GenerationEvent;

/// Longest unterminated line kept between chunks.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Accumulates raw chunks and yields complete `\n`-terminated lines.
///
/// Bytes are buffered (not strings) so a UTF-8 sequence split across two chunks decodes correctly.
/// A partial line that grows past [`MAX_LINE_BYTES`] is dropped up to its next newline.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    discarding: bool,
}

impl LineBuffer {
    /// Appends a chunk and drains every complete line from the buffer.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if self.discarding {
                self.discarding = false;
                continue;
            }
            lines.push(String::from_utf8_lossy(&line[..pos]).into_owned());
        }
        if self.pending.len() > MAX_LINE_BYTES {
            warn!(
                buffered = self.pending.len(),
                limit = MAX_LINE_BYTES,
                "Status line too long, dropping it"
            );
            self.pending.clear();
            self.discarding = true;
        }
        lines
    }

    /// Returns the unterminated tail, if any, once the stream has ended.
    pub fn finish(self) -> Option<String> {
        if self.discarding || self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}

/// Reads status records until a terminal one.
///
/// Returns `Ok(Some(url))` on the first `SUCCESS`, `Ok(None)` on `FAILURE`/`ERROR` or when the
/// stream ends first. Undecodable lines are skipped. Chunk errors are returned as-is.
pub async fn read_status_stream<S, B, E>(stream: S) -> Result<Option<String>, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let mut stream = std::pin::pin!(stream);
    let mut lines = LineBuffer::default();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for line in lines.push(chunk.as_ref()) {
            if let ControlFlow::Break(outcome) = observe(&line) {
                return Ok(outcome);
            }
        }
    }

    if let Some(line) = lines.finish() {
        if let ControlFlow::Break(outcome) = observe(&line) {
            return Ok(outcome);
        }
    }

    info!("Image stream closed without SUCCESS");
    Ok(None)
}

fn observe(line: &str) -> ControlFlow<Option<String>> {
    let Some(event) = GenerationEvent::parse_line(line) else {
        if !line.trim().is_empty() {
            debug!(line = %line, "Skipping undecodable status line");
        }
        return ControlFlow::Continue(());
    };

    match event {
        GenerationEvent::Success { image_url } => {
            info!(image_url = %image_url, "Image generation succeeded");
            ControlFlow::Break(Some(image_url))
        }
        GenerationEvent::Waiting { queue_position } => {
            info!(queue_position = ?queue_position, "Image generation queued");
            ControlFlow::Continue(())
        }
        GenerationEvent::Failure { reason } => {
            warn!(reason = ?reason, "Image service reported failure");
            ControlFlow::Break(None)
        }
        GenerationEvent::Unrecognized { status } => {
            debug!(status = %status, "Unrecognized generation status");
            ControlFlow::Continue(())
        }
    }
}
