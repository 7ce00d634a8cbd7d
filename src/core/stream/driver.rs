//! Stream driver: pumps transport events through the accumulator, racing cancellation and
//! the deadline.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::accumulator::{ChunkOutcome, StreamAccumulator};
use super::transport::{Transport, TransportEvent};
use super::{ABNORMAL_CLOSE, StreamError};

/// Progress reported while a stream is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent<'a> {
    /// Transport opened; the payload is about to be sent.
    Opened,
    /// Text accumulated so far, for live display only. `text` is normalized, `raw` is the
    /// buffer as received.
    Preview { text: &'a str, raw: &'a str },
}

enum Step {
    Cancelled,
    TimedOut,
    Event(Option<TransportEvent>),
}

/// Drive one request's stream to its final answer text.
///
/// The payload is sent when the transport reports `Opened`. The transport is closed on
/// every exit path.
pub async fn drive_stream<T, F>(
    transport: &mut T,
    payload: &str,
    cancel: &CancellationToken,
    timeout: Duration,
    mut on_event: F,
) -> Result<String, StreamError>
where
    T: Transport,
    F: FnMut(StreamEvent<'_>),
{
    let mut acc = StreamAccumulator::new();
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        let step = tokio::select! {
            biased;
            _ = cancel.cancelled() => Step::Cancelled,
            _ = &mut deadline => Step::TimedOut,
            event = transport.next_event() => Step::Event(event),
        };

        match step {
            Step::Cancelled => {
                log::debug!("Stream cancelled; closing transport");
                transport.close().await;
                return Err(StreamError::Cancelled);
            }
            Step::TimedOut => {
                log::warn!("No terminator or close within {:?}; closing transport", timeout);
                transport.close().await;
                return acc.on_timeout(timeout);
            }
            Step::Event(None) => {
                log::debug!("Event source ended without a close frame");
                transport.close().await;
                return acc.on_close(ABNORMAL_CLOSE, "");
            }
            Step::Event(Some(TransportEvent::Opened)) => {
                on_event(StreamEvent::Opened);
                log::debug!("Transport open; sending {} byte payload", payload.len());
                if let Err(e) = transport.send(payload).await {
                    log::error!("Error sending request payload: {}", e);
                    transport.close().await;
                    return Err(StreamError::SendFailure(e));
                }
            }
            Step::Event(Some(TransportEvent::Chunk { data })) => {
                log::debug!("Received {} byte chunk", data.len());
                match acc.on_chunk(&data) {
                    ChunkOutcome::Buffering { preview } => on_event(StreamEvent::Preview {
                        text: &preview,
                        raw: acc.buffer(),
                    }),
                    ChunkOutcome::Finalized { final_text } => {
                        transport.close().await;
                        return Ok(final_text);
                    }
                    ChunkOutcome::Ignored => {}
                }
            }
            Step::Event(Some(TransportEvent::Closed { code, reason })) => {
                log::debug!("Transport closed: {} {}", code, reason);
                transport.close().await;
                return acc.on_close(code, &reason);
            }
            Step::Event(Some(TransportEvent::Error { message })) => {
                log::warn!("Transport error: {}", message);
                transport.close().await;
                return acc
                    .on_close(ABNORMAL_CLOSE, &message)
                    .map_err(|_| StreamError::Transport(message));
            }
        }
    }
}
