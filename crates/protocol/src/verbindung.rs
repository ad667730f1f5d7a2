//! Auswahl der Leitung anhand der Relay-Adresse
//!
//! | Adresse                      | Leitung                                 |
//! |------------------------------|-----------------------------------------|
//! | `http://` / `https://`       | WebSocket mit Socket.IO (`/socket.io/`) |
//! | `ws://` / `wss://`           | WebSocket, JSON-Event pro Text-Frame    |
//! | `tcp://host:port`, `host:port` | TCP mit `FrameCodec`                  |

use std::io;

use async_trait::async_trait;
use url::Url;

use crate::channel::{RelayChannel, TcpRelayChannel};
use crate::events::{ClientEvent, ServerEvent};
use crate::text::TextFormat;
use crate::websocket::WebSocketRelayChannel;

/// Wie eine Relay-Adresse erreicht wird
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// `host:port`
    Tcp(String),
    WebSocket { url: Url, format: TextFormat },
}

impl Transport {
    /// Bestimmt die Leitung fuer eine Relay-Adresse
    pub fn bestimmen(adresse: &str) -> io::Result<Self> {
        let adresse = adresse.trim();
        if !adresse.contains("://") {
            return Ok(Self::Tcp(adresse.trim_end_matches('/').to_string()));
        }

        let mut url = Url::parse(adresse).map_err(|e| ungueltig(adresse, &e.to_string()))?;
        let schema = url.scheme().to_string();
        match schema.as_str() {
            "tcp" => {
                let host = url
                    .host_str()
                    .ok_or_else(|| ungueltig(adresse, "Host fehlt"))?;
                let port = url.port().ok_or_else(|| ungueltig(adresse, "Port fehlt"))?;
                Ok(Self::Tcp(format!("{host}:{port}")))
            }
            "ws" | "wss" => Ok(Self::WebSocket {
                url,
                format: TextFormat::Json,
            }),
            "http" | "https" => {
                let ws_schema = if schema == "https" { "wss" } else { "ws" };
                url.set_scheme(ws_schema)
                    .map_err(|_| ungueltig(adresse, "Schema nicht umstellbar"))?;
                if url.path() == "/" {
                    url.set_path("/socket.io/");
                }
                url.query_pairs_mut()
                    .append_pair("EIO", "4")
                    .append_pair("transport", "websocket");
                Ok(Self::WebSocket {
                    url,
                    format: TextFormat::SocketIo,
                })
            }
            anderes => Err(ungueltig(
                adresse,
                &format!("Schema '{anderes}' wird nicht unterstuetzt"),
            )),
        }
    }
}

fn ungueltig(adresse: &str, grund: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("Ungueltige Relay-Adresse '{adresse}': {grund}"),
    )
}

/// Offene Verbindung zum Relay, unabhaengig von der Leitung
pub enum RelayVerbindung {
    Tcp(TcpRelayChannel),
    WebSocket(WebSocketRelayChannel),
}

impl RelayVerbindung {
    /// Verbindet mit dem Relay unter `adresse`
    pub async fn aufbauen(adresse: &str) -> io::Result<Self> {
        match Transport::bestimmen(adresse)? {
            Transport::Tcp(ziel) => Ok(Self::Tcp(TcpRelayChannel::connect(&ziel).await?)),
            Transport::WebSocket { url, format } => Ok(Self::WebSocket(
                WebSocketRelayChannel::connect(&url, format).await?,
            )),
        }
    }
}

#[async_trait]
impl RelayChannel for RelayVerbindung {
    async fn send(&mut self, event: ClientEvent) -> io::Result<()> {
        match self {
            Self::Tcp(channel) => channel.send(event).await,
            Self::WebSocket(channel) => channel.send(event).await,
        }
    }

    async fn recv(&mut self) -> Option<ServerEvent> {
        match self {
            Self::Tcp(channel) => channel.recv().await,
            Self::WebSocket(channel) => channel.recv().await,
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(channel) => channel.close().await,
            Self::WebSocket(channel) => channel.close().await,
        }
    }
}
