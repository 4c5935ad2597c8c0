use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use z2m::api::RawMessage;
use z2m::request::Z2mRequest;

use crate::error::{SwitchError, SwitchResult};

pub struct Z2mWebSocket {
    pub name: String,
    pub socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Z2mWebSocket {
    pub const fn new(name: String, socket: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self { name, socket }
    }

    pub async fn send(&mut self, topic: &str, payload: &Z2mRequest) -> SwitchResult<()> {
        let api_req = RawMessage {
            topic: topic.to_string(),
            payload: serde_json::to_value(payload)?,
        };

        let json = serde_json::to_string(&api_req)?;
        log::debug!("[{}] Sending {json}", self.name);
        let msg = Message::text(json);
        Ok(self.socket.send(msg).await?)
    }

    /// Next published message, skipping websocket control frames
    pub async fn recv(&mut self) -> SwitchResult<RawMessage> {
        loop {
            let pkt = self.next().await.ok_or(SwitchError::UnexpectedZ2mEof)??;

            let txt = match pkt {
                Message::Text(txt) => txt,
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(_) => return Err(SwitchError::UnexpectedZ2mEof),
                Message::Binary(_) => {
                    log::error!("[{}] Received non-text message on websocket :(", self.name);
                    return Err(SwitchError::UnexpectedZ2mReply(pkt));
                }
            };

            log::trace!("[{}] Incoming z2m message: {txt}", self.name);

            match serde_json::from_str::<RawMessage>(&txt) {
                Ok(msg) => return Ok(msg),
                Err(err) => {
                    log::error!(
                        "[{}] Invalid websocket message: {:#?} [{}..]",
                        self.name,
                        err,
                        &txt.chars().take(128).collect::<String>()
                    );
                }
            }
        }
    }

    pub async fn close(&mut self) -> SwitchResult<()> {
        Ok(self.socket.close(None).await?)
    }
}

impl Stream for Z2mWebSocket
where
    Self: Unpin,
{
    type Item = Result<Message, tungstenite::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        WebSocketStream::poll_next(Pin::new(&mut self.socket), cx)
    }
}
