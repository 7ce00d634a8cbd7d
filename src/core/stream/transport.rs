//! Transport surface the stream driver depends on, plus an in-memory scripted transport.

use std::collections::VecDeque;
use std::future::Future;

use serde::{Deserialize, Serialize};

/// Event delivered by a duplex streaming channel, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransportEvent {
    Opened,
    Chunk { data: String },
    Closed { code: u16, reason: String },
    Error { message: String },
}

/// Minimal duplex channel: send a payload, receive events, close.
pub trait Transport: Send {
    /// Send a serialized request payload.
    fn send(&mut self, payload: &str) -> impl Future<Output = Result<(), String>> + Send;

    /// Next event, or `None` when the event source is gone.
    fn next_event(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Close the channel. Idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Replays a recorded event script. Events after `close()` are not delivered.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    events: VecDeque<TransportEvent>,
    sent: Vec<String>,
    closed: bool,
    reject_send: Option<String>,
}

impl ScriptedTransport {
    pub fn new(events: impl IntoIterator<Item = TransportEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Parse a JSON array of events (the `replay` command's input format).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let events: Vec<TransportEvent> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    /// Script for a plain answer: opened, one chunk per item, then a normal close.
    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut events = vec![TransportEvent::Opened];
        events.extend(
            chunks
                .into_iter()
                .map(|c| TransportEvent::Chunk { data: c.into() }),
        );
        events.push(TransportEvent::Closed {
            code: super::NORMAL_CLOSE,
            reason: String::new(),
        });
        Self::new(events)
    }

    /// Make every `send` fail with `message`.
    #[cfg(test)]
    pub fn rejecting_send(mut self, message: impl Into<String>) -> Self {
        self.reject_send = Some(message.into());
        self
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for ScriptedTransport {
    async fn send(&mut self, payload: &str) -> Result<(), String> {
        if let Some(msg) = &self.reject_send {
            return Err(msg.clone());
        }
        self.sent.push(payload.to_string());
        Ok(())
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        if self.closed {
            return None;
        }
        match self.events.pop_front() {
            Some(event) => Some(event),
            // An exhausted script stays silent, like an idle socket.
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_script_json() {
        let json = r#"[
            {"event": "opened"},
            {"event": "chunk", "data": "Hi"},
            {"event": "closed", "code": 1000, "reason": ""}
        ]"#;
        let t = ScriptedTransport::from_json(json).unwrap();
        assert_eq!(t.events.len(), 3);
        assert_eq!(
            t.events[1],
            TransportEvent::Chunk {
                data: "Hi".to_string()
            }
        );
    }

    #[test]
    fn from_chunks_wraps_open_and_close() {
        let t = ScriptedTransport::from_chunks(["a", "b"]);
        assert_eq!(t.events.front(), Some(&TransportEvent::Opened));
        assert!(matches!(
            t.events.back(),
            Some(TransportEvent::Closed { code: 1000, .. })
        ));
    }

    #[tokio::test]
    async fn closed_transport_delivers_nothing() {
        let mut t = ScriptedTransport::from_chunks(["a"]);
        t.close().await;
        assert!(t.next_event().await.is_none());
        assert!(t.is_closed());
    }
}
