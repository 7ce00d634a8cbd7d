//! WebSocket transport for the answer service.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::transport::{Transport, TransportEvent};
use super::{ABNORMAL_CLOSE, NORMAL_CLOSE};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One socket per request, addressed by session id.
pub struct WsTransport {
    socket: Option<Socket>,
    opened_reported: bool,
}

/// `{base}/{session_id}?token=Bearer%20{token}`
pub fn session_url(base_url: &str, session_id: &str, token: &str) -> String {
    let token = format!("Bearer {}", token);
    format!(
        "{}/{}?token={}",
        base_url.trim_end_matches('/'),
        session_id,
        urlencoding::encode(&token)
    )
}

impl WsTransport {
    /// Connect. The first event delivered is `Opened`.
    pub async fn connect(url: &str) -> Result<Self, String> {
        log::debug!("Connecting to {}", redact_token(url));
        let (socket, _response) = connect_async(url).await.map_err(|e| e.to_string())?;
        Ok(Self {
            socket: Some(socket),
            opened_reported: false,
        })
    }
}

fn redact_token(url: &str) -> &str {
    url.split_once("?token=").map(|(base, _)| base).unwrap_or(url)
}

fn close_event(frame: Option<CloseFrame<'_>>) -> TransportEvent {
    match frame {
        Some(f) => TransportEvent::Closed {
            code: u16::from(f.code),
            reason: f.reason.into_owned(),
        },
        None => TransportEvent::Closed {
            code: ABNORMAL_CLOSE,
            reason: String::new(),
        },
    }
}

impl Transport for WsTransport {
    async fn send(&mut self, payload: &str) -> Result<(), String> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| "connection is closed".to_string())?;
        socket
            .send(Message::Text(payload.to_string()))
            .await
            .map_err(|e| e.to_string())
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        if !self.opened_reported {
            self.opened_reported = true;
            return self.socket.as_ref().map(|_| TransportEvent::Opened);
        }
        loop {
            let socket = self.socket.as_mut()?;
            let msg = match socket.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    return Some(TransportEvent::Error {
                        message: e.to_string(),
                    });
                }
                None => return None,
            };
            match msg {
                Message::Text(data) => return Some(TransportEvent::Chunk { data }),
                Message::Binary(bytes) => {
                    return Some(TransportEvent::Chunk {
                        data: String::from_utf8_lossy(&bytes).into_owned(),
                    });
                }
                Message::Close(frame) => return Some(close_event(frame)),
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            let frame = CloseFrame {
                code: CloseCode::from(NORMAL_CLOSE),
                reason: "".into(),
            };
            if let Err(e) = socket.close(Some(frame)).await {
                log::debug!("Error closing socket: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_url_encodes_bearer_token() {
        let url = session_url("wss://host/api/v2/ws/", "abc123", "t0k+en/=");
        assert_eq!(url, "wss://host/api/v2/ws/abc123?token=Bearer%20t0k%2Ben%2F%3D");
    }

    #[test]
    fn session_url_keeps_unreserved_token_chars() {
        let url = session_url("wss://host/ws", "s1", "a-b_c.d~e");
        assert_eq!(url, "wss://host/ws/s1?token=Bearer%20a-b_c.d~e");
    }

    #[test]
    fn redacts_token_for_logging() {
        assert_eq!(redact_token("wss://h/ws/1?token=secret"), "wss://h/ws/1");
        assert_eq!(redact_token("wss://h/ws/1"), "wss://h/ws/1");
    }
}
