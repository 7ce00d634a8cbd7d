//! Session: at most one in-flight request, tracked by a monotonic generation counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Owns the request generation and the cancellation handle of the in-flight stream.
#[derive(Debug, Default)]
pub struct Session {
    generation: Arc<AtomicU64>,
    current: Option<CancellationToken>,
}

/// Handle for one request. Stale once a newer request begins.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
    cancel: CancellationToken,
    session_id: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any previous stream, then start a new request generation.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.cancel_current();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        self.current = Some(cancel.clone());
        log::debug!("Request generation {} started", generation);
        RequestTicket {
            generation,
            latest: Arc::clone(&self.generation),
            cancel,
            session_id: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Cancel the in-flight stream, if any. Idempotent.
    pub fn cancel_current(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while no later request has begun and this one was not cancelled.
    pub fn is_current(&self) -> bool {
        !self.cancel.is_cancelled() && self.latest.load(Ordering::SeqCst) == self.generation
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Transport session id for this request.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}
