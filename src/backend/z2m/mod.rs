pub mod websocket;

use std::time::Duration;

use async_trait::async_trait;
use native_tls::TlsConnector;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::{Connector, connect_async_tls_with_config};

use crate::backend::Transport;
use crate::backend::z2m::websocket::Z2mWebSocket;
use crate::codec::command::WireCommand;
use crate::config::Z2mServer;
use crate::error::{SwitchError, SwitchResult};

/// Transport publishing switch commands through a zigbee2mqtt websocket
pub struct Z2mBackend {
    settle: Duration,
    name: String,
    device: String,
    socket: Mutex<Z2mWebSocket>,
}

impl Z2mBackend {
    /// How long the socket must stay quiet before a command is sent
    pub const SETTLE_TIME: Duration = Duration::from_millis(250);

    pub async fn connect(name: &str, server: &Z2mServer, device: &str) -> SwitchResult<Self> {
        // let's not include auth tokens in log output
        let sanitized_url = server.get_sanitized_url();
        let url = server.get_url();

        if url != server.url {
            log::info!("[{name}] Rewrote url for compatibility with z2m 2.x.");
            log::info!("[{name}] Consider updating websocket url to {sanitized_url}");
        }

        // if tls verification is disabled, build a TlsConnector that explicitly
        // does not check certificate validity. This is obviously neither safe
        // nor recommended.
        let connector = if server.disable_tls_verify.unwrap_or_default() {
            log::warn!("[{name}] TLS verification disabled; will accept any certificate!");
            Some(Connector::NativeTls(
                TlsConnector::builder()
                    .danger_accept_invalid_certs(true)
                    .build()?,
            ))
        } else {
            None
        };

        log::info!("[{name}] Connecting to {sanitized_url}");
        let (socket, _) = connect_async_tls_with_config(url.as_str(), None, false, connector).await?;

        Ok(Self {
            settle: Self::SETTLE_TIME,
            name: name.to_string(),
            device: device.to_string(),
            socket: Mutex::new(Z2mWebSocket::new(name.to_string(), socket)),
        })
    }

    #[must_use]
    pub const fn with_settle_time(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Read and drop everything already queued on the socket.
    ///
    /// z2m replays cached device state to new clients, so without this a
    /// read would be answered by whatever was published before it was sent.
    async fn discard_pending(&self, socket: &mut Z2mWebSocket) -> SwitchResult<()> {
        let mut count = 0usize;
        while let Ok(msg) = timeout(self.settle, socket.recv()).await {
            let msg = msg?;
            log::trace!("[{}] Discarding stale message on {}", self.name, msg.topic);
            count += 1;
        }
        if count > 0 {
            log::debug!("[{}] Discarded {count} stale messages", self.name);
        }
        Ok(())
    }

    async fn next_field(&self, socket: &mut Z2mWebSocket, field: &str) -> SwitchResult<Value> {
        loop {
            let msg = socket.recv().await?;
            if msg.topic != self.device {
                continue;
            }
            if let Some(value) = msg.payload.get(field) {
                return Ok(value.clone());
            }
            log::trace!("[{}] State update without {field}: {}", self.name, msg.payload);
        }
    }

    /// Wait until the device publishes a state containing `field`, and
    /// return its value. Only messages received after the last command was
    /// sent are considered.
    pub async fn wait_for_field(&self, field: &str, limit: Duration) -> SwitchResult<Value> {
        let mut socket = self.socket.lock().await;

        timeout(limit, self.next_field(&mut socket, field))
            .await
            .map_err(|_| SwitchError::Z2mTimeout(field.to_string()))?
    }

    pub async fn close(self) -> SwitchResult<()> {
        log::debug!("[{}] Closing connection", self.name);
        self.socket.into_inner().close().await
    }
}

#[async_trait]
impl Transport for Z2mBackend {
    async fn send(&self, cmd: &WireCommand) -> SwitchResult<()> {
        let req = cmd.to_z2m();
        let topic = req.topic(&self.device, cmd.endpoint);
        let mut socket = self.socket.lock().await;
        self.discard_pending(&mut socket).await?;
        socket.send(&topic, &req).await
    }
}
