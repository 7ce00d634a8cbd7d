//! Streaming answer intake: buffer socket chunks until the terminator, a close, or a timeout.

mod accumulator;
mod driver;
mod transport;
mod ws;

use std::time::Duration;

pub use driver::{StreamEvent, drive_stream};
pub use transport::{ScriptedTransport, Transport};
#[cfg(test)]
pub use transport::TransportEvent;
pub use ws::{WsTransport, session_url};

/// In-band sentinel: its first occurrence ends the answer.
pub const TERMINATOR: &str = "<Response>";
/// Closing form of the sentinel, stripped during normalization.
pub const TERMINATOR_CLOSE: &str = "</Response>";
/// Close code for a normal socket shutdown.
pub const NORMAL_CLOSE: u16 = 1000;
/// Close code used when the event source disappears without a close frame.
pub const ABNORMAL_CLOSE: u16 = 1006;
/// Max buffered answer size (2MB) to prevent unbounded growth from malformed streams.
pub const MAX_BUFFER_BYTES: usize = 2 * 1024 * 1024;
/// Default wait for a terminator or close before force-closing.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors ending a stream without a usable answer.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Connection closed unexpectedly (code {code}{})", fmt_reason(.reason))]
    StreamClosedEmpty { code: u16, reason: String },
    #[error("No response within {}s", .0.as_secs())]
    StreamTimeout(Duration),
    #[error("Failed to send message: {0}")]
    SendFailure(String),
    #[error("Connection error: {0}")]
    Transport(String),
    #[error("Request cancelled")]
    Cancelled,
}

fn fmt_reason(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!(": {}", reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_empty_message_includes_reason_when_present() {
        let e = StreamError::StreamClosedEmpty {
            code: 1011,
            reason: "server error".to_string(),
        };
        assert_eq!(e.to_string(), "Connection closed unexpectedly (code 1011: server error)");
        let e = StreamError::StreamClosedEmpty {
            code: 1006,
            reason: String::new(),
        };
        assert_eq!(e.to_string(), "Connection closed unexpectedly (code 1006)");
    }

    #[test]
    fn timeout_message_in_seconds() {
        let e = StreamError::StreamTimeout(Duration::from_secs(60));
        assert_eq!(e.to_string(), "No response within 60s");
    }
}
