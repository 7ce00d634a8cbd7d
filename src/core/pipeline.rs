//! End-to-end request flow: payload, stream, reconstruction, document update.

use std::time::Duration;

use crate::core::config::{Config, RequestSettings};
use crate::core::error::AssistError;
use crate::core::payload::RequestPayload;
use crate::core::render::{self, ApplyOutcome, DocumentSink, InsertOp};
use crate::core::session::{RequestTicket, Session};
use crate::core::stream::{self, StreamError, StreamEvent, Transport, WsTransport};
use crate::core::text::{self, Block};
use crate::core::trigger::{RequestKind, compose_message};

/// Result of a finished request.
#[derive(Debug)]
pub struct Outcome {
    pub final_text: String,
    pub blocks: Vec<Block>,
    pub ops: Vec<InsertOp>,
    /// `None` when the answer had no content and the document was left alone.
    pub applied: Option<ApplyOutcome>,
}

/// What to ask and how long to wait for it.
#[derive(Debug, Clone, Copy)]
pub struct RequestParams<'a> {
    pub kind: RequestKind,
    pub content: &'a str,
    pub settings: &'a RequestSettings,
    pub timeout: Duration,
}

/// Stream one request through `transport` and write the answer into `sink`.
///
/// The sink is only touched after the stream finalized successfully.
pub async fn process<T, S, F>(
    ticket: &RequestTicket,
    transport: &mut T,
    sink: &mut S,
    params: RequestParams<'_>,
    on_event: F,
) -> Result<Outcome, AssistError>
where
    T: Transport,
    S: DocumentSink + ?Sized,
    F: FnMut(StreamEvent<'_>),
{
    let message = compose_message(params.kind, params.content);
    let payload = RequestPayload::new(params.settings, message)
        .to_json()
        .map_err(|e| StreamError::SendFailure(e.to_string()))?;

    let final_text = stream::drive_stream(
        transport,
        &payload,
        ticket.cancel_token(),
        params.timeout,
        on_event,
    )
    .await?;

    let blocks = text::reconstruct(&final_text);
    let ops = render::render(&blocks);
    let applied = if ops.is_empty() {
        log::warn!("Answer had no content; leaving document unchanged");
        None
    } else {
        Some(render::apply(&ops, sink, ticket)?)
    };

    Ok(Outcome {
        final_text,
        blocks,
        ops,
        applied,
    })
}

/// Session-scoped assistant talking to the live answer service.
pub struct Assistant {
    config: Config,
    session: Session,
}

impl Assistant {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: Session::new(),
        }
    }

    /// Supersede any in-flight request, open a socket for a new one, and run it.
    pub async fn ask<S, F>(
        &mut self,
        sink: &mut S,
        kind: RequestKind,
        content: &str,
        on_event: F,
    ) -> Result<Outcome, AssistError>
    where
        S: DocumentSink + ?Sized,
        F: FnMut(StreamEvent<'_>),
    {
        let token = self.config.token()?;
        let ticket = self.session.begin_request();
        let url = stream::session_url(&self.config.ws_url, ticket.session_id(), token);
        let mut transport = WsTransport::connect(&url)
            .await
            .map_err(StreamError::Transport)?;
        let params = RequestParams {
            kind,
            content,
            settings: &self.config.request,
            timeout: self.config.timeout,
        };
        process(&ticket, &mut transport, sink, params, on_event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::MemoryDocument;
    use crate::core::stream::{ScriptedTransport, TransportEvent};

    async fn run(
        ticket: &RequestTicket,
        transport: &mut ScriptedTransport,
        doc: &mut MemoryDocument,
    ) -> Result<Outcome, AssistError> {
        let settings = RequestSettings::default();
        let params = RequestParams {
            kind: RequestKind::Summarize,
            content: "Quarterly memo body",
            settings: &settings,
            timeout: Duration::from_secs(60),
        };
        process(ticket, transport, doc, params, |_| {}).await
    }

    #[tokio::test]
    async fn full_flow_replaces_document() {
        let mut session = Session::new();
        let ticket = session.begin_request();
        let mut transport = ScriptedTransport::from_chunks([
            "Summary:\\n",
            "- revenue up\\n- costs flat\\n",
            "Overall the quarter went well, mostly.<Response>ignored",
        ]);
        let mut doc = MemoryDocument::with_text(["/ai summarize"]);
        let outcome = run(&ticket, &mut transport, &mut doc).await.unwrap();

        assert_eq!(outcome.blocks.len(), 3);
        assert!(matches!(
            outcome.applied,
            Some(ApplyOutcome::Applied { fallbacks: 0, .. })
        ));
        assert_eq!(
            doc.to_text(),
            "Summary:\n\n  \u{2022} revenue up\n  \u{2022} costs flat\n\nOverall the quarter went well, mostly."
        );

        let sent: serde_json::Value = serde_json::from_str(&transport.sent()[0]).unwrap();
        assert!(
            sent["message_text"]
                .as_str()
                .unwrap()
                .contains("Quarterly memo body")
        );
    }

    #[tokio::test]
    async fn failed_stream_leaves_document_untouched() {
        let mut session = Session::new();
        let ticket = session.begin_request();
        let mut transport = ScriptedTransport::new([
            TransportEvent::Opened,
            TransportEvent::Closed {
                code: 1011,
                reason: String::new(),
            },
        ]);
        let mut doc = MemoryDocument::with_text(["keep"]);
        let err = run(&ticket, &mut transport, &mut doc).await.unwrap_err();
        assert!(matches!(
            err,
            AssistError::Stream(StreamError::StreamClosedEmpty { .. })
        ));
        assert_eq!(doc.to_text(), "keep");
    }

    #[tokio::test]
    async fn empty_answer_does_not_clear_document() {
        let mut session = Session::new();
        let ticket = session.begin_request();
        let mut transport = ScriptedTransport::from_chunks(["  <Response>"]);
        let mut doc = MemoryDocument::with_text(["keep"]);
        let outcome = run(&ticket, &mut transport, &mut doc).await.unwrap();
        assert!(outcome.blocks.is_empty());
        assert!(outcome.applied.is_none());
        assert_eq!(doc.to_text(), "keep");
    }

    #[tokio::test]
    async fn superseded_request_is_cancelled() {
        let mut session = Session::new();
        let stale = session.begin_request();
        let _fresh = session.begin_request();
        let mut transport = ScriptedTransport::from_chunks(["late answer<Response>"]);
        let mut doc = MemoryDocument::with_text(["current"]);
        let err = run(&stale, &mut transport, &mut doc).await.unwrap_err();
        assert!(matches!(err, AssistError::Stream(StreamError::Cancelled)));
        assert_eq!(doc.to_text(), "current");
    }

    #[tokio::test]
    async fn ask_without_token_fails_before_connecting() {
        let config = crate::core::config::load_from(|_| None).unwrap();
        let mut assistant = Assistant::new(config);
        let mut doc = MemoryDocument::new();
        let err = assistant
            .ask(&mut doc, RequestKind::ProcessText, "hi", |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AssistError::Config(_)));
    }
}
