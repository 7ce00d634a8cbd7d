//! Per-request answer buffer: terminator detection, close and timeout policies.

use std::time::Duration;

use crate::core::text::normalize;

use super::{MAX_BUFFER_BYTES, NORMAL_CLOSE, StreamError, TERMINATOR};

/// Result of feeding one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// No terminator yet. `preview` is the whole buffer normalized for live display.
    Buffering { preview: String },
    /// Terminator seen. The transport should be closed.
    Finalized { final_text: String },
    /// The buffer is frozen; the chunk was dropped.
    Ignored,
}

/// Owns the growing answer buffer for one request.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /// Stored answer text, at most `MAX_BUFFER_BYTES`.
    buffer: String,
    /// Last bytes of the stream, long enough to hold all but one byte of the terminator.
    tail: String,
    /// Total stream bytes received.
    seen: usize,
    overflowed: bool,
    final_text: Option<String>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finalized(&self) -> bool {
        self.final_text.is_some()
    }

    /// Raw answer text stored so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Frozen answer, once finalized.
    #[cfg(test)]
    pub fn final_text(&self) -> Option<&str> {
        self.final_text.as_deref()
    }

    fn has_content(&self) -> bool {
        !self.buffer.trim().is_empty()
    }

    fn finalize(&mut self, text: String) -> String {
        log::info!("Stream finalized with {} bytes", text.len());
        self.final_text = Some(text.clone());
        text
    }

    /// Store as much of `text` as the cap allows. Text past the cap is dropped.
    fn store(&mut self, text: &str) {
        if self.overflowed {
            return;
        }
        let room = MAX_BUFFER_BYTES - self.buffer.len();
        if text.len() <= room {
            self.buffer.push_str(text);
            return;
        }
        let mut cut = room;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buffer.push_str(&text[..cut]);
        self.overflowed = true;
        log::warn!(
            "Answer buffer full ({} bytes); dropping further text until the stream ends",
            self.buffer.len()
        );
    }

    /// Append a chunk. The terminator is searched in the stream itself, not in the capped
    /// buffer, so it is found even when it straddles chunks or arrives after the cap.
    pub fn on_chunk(&mut self, chunk: &str) -> ChunkOutcome {
        if self.is_finalized() {
            log::debug!("Dropping {} byte chunk after finalize", chunk.len());
            return ChunkOutcome::Ignored;
        }

        let mut window = std::mem::take(&mut self.tail);
        let window_start = self.seen - window.len();
        window.push_str(chunk);

        if let Some(idx) = window.find(TERMINATOR) {
            // Stream offset where the terminator begins.
            let end = window_start + idx;
            if end <= self.buffer.len() {
                self.buffer.truncate(end);
            } else if !self.overflowed {
                self.store(&chunk[..end - self.seen]);
            }
            self.seen += chunk.len();
            let text = self.buffer.trim().to_string();
            return ChunkOutcome::Finalized {
                final_text: self.finalize(text),
            };
        }

        self.store(chunk);
        self.seen += chunk.len();
        let mut keep_from = window.len().saturating_sub(TERMINATOR.len() - 1);
        while !window.is_char_boundary(keep_from) {
            keep_from += 1;
        }
        self.tail = window[keep_from..].to_string();

        ChunkOutcome::Buffering {
            preview: normalize(&self.buffer),
        }
    }

    /// Transport closed. Accumulated text is delivered even without a terminator;
    /// an empty buffer is a failure unless the answer was already finalized.
    pub fn on_close(&mut self, code: u16, reason: &str) -> Result<String, StreamError> {
        if let Some(text) = &self.final_text {
            return Ok(text.clone());
        }
        if self.has_content() {
            if code != NORMAL_CLOSE {
                log::warn!(
                    "Stream closed with code {} before terminator; keeping partial answer",
                    code
                );
            }
            let text = self.buffer.trim().to_string();
            return Ok(self.finalize(text));
        }
        Err(StreamError::StreamClosedEmpty {
            code,
            reason: reason.to_string(),
        })
    }

    /// Deadline passed with no terminator and no close.
    pub fn on_timeout(&mut self, waited: Duration) -> Result<String, StreamError> {
        if let Some(text) = &self.final_text {
            return Ok(text.clone());
        }
        if self.has_content() {
            log::warn!("Stream timed out after {:?}; keeping partial answer", waited);
            let text = self.buffer.trim().to_string();
            return Ok(self.finalize(text));
        }
        Err(StreamError::StreamTimeout(waited))
    }
}
