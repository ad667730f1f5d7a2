//! WebSocket-Verbindung zum Relay
//!
//! Jedes Event ist ein Text-Frame im konfigurierten `TextFormat`. Bei
//! Socket.IO wird nach dem WebSocket-Handshake noch der Standard-Namespace
//! betreten, Engine.IO pings werden beim Lesen beantwortet.

use std::io;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::channel::RelayChannel;
use crate::events::{ClientEvent, ServerEvent};
use crate::text::{TextFormat, TextFrame, ENGINEIO_PONG, SOCKETIO_CONNECT, SOCKETIO_DISCONNECT};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket-Verbindung (ws/wss, optional mit Socket.IO-Framing)
pub struct WebSocketRelayChannel {
    stream: WsStream,
    format: TextFormat,
    adresse: String,
}

impl WebSocketRelayChannel {
    /// Baut die WebSocket-Verbindung auf
    ///
    /// Bei `TextFormat::SocketIo` kehrt der Aufruf erst zurueck, wenn das
    /// Relay den Namespace-Connect bestaetigt hat.
    pub async fn connect(url: &Url, format: TextFormat) -> io::Result<Self> {
        tracing::info!(url = %url, ?format, "Verbinde mit Relay");
        let (stream, antwort) = connect_async(url.as_str()).await.map_err(ws_fehler)?;
        tracing::debug!(status = %antwort.status(), "WebSocket-Handshake abgeschlossen");

        let mut channel = Self {
            stream,
            format,
            adresse: url.to_string(),
        };
        if format == TextFormat::SocketIo {
            channel.socketio_verbinden().await?;
        }
        tracing::info!(url = %url, "WebSocket-Verbindung hergestellt");
        Ok(channel)
    }

    pub fn adresse(&self) -> &str {
        &self.adresse
    }

    async fn socketio_verbinden(&mut self) -> io::Result<()> {
        loop {
            match self.naechster_frame().await? {
                TextFrame::Geoeffnet => break,
                TextFrame::Ping => self.text_senden(ENGINEIO_PONG).await?,
                anderes => tracing::debug!(frame = ?anderes, "Frame vor Engine.IO open ignoriert"),
            }
        }

        self.text_senden(SOCKETIO_CONNECT).await?;
        loop {
            match self.naechster_frame().await? {
                TextFrame::Verbunden => return Ok(()),
                TextFrame::Verweigert(grund) => {
                    return Err(io::Error::new(io::ErrorKind::ConnectionRefused, grund))
                }
                TextFrame::Geschlossen => {
                    return Err(io::Error::new(
                        io::ErrorKind::ConnectionAborted,
                        "Relay hat die Socket.IO-Sitzung beendet",
                    ))
                }
                TextFrame::Ping => self.text_senden(ENGINEIO_PONG).await?,
                anderes => tracing::debug!(frame = ?anderes, "Frame vor Socket.IO connect ignoriert"),
            }
        }
    }

    /// Naechster Text-Frame; Fehler wenn die Verbindung endet
    async fn naechster_frame(&mut self) -> io::Result<TextFrame> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(self.format.dekodieren(&text)),
                Some(Ok(Message::Close(_))) | None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "WebSocket vom Relay geschlossen",
                    ))
                }
                // Ping/Pong beantwortet tungstenite selbst, Binaer-Frames gibt es nicht
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(ws_fehler(e)),
            }
        }
    }

    async fn text_senden(&mut self, text: &str) -> io::Result<()> {
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .map_err(ws_fehler)
    }
}

#[async_trait]
impl RelayChannel for WebSocketRelayChannel {
    async fn send(&mut self, event: ClientEvent) -> io::Result<()> {
        tracing::debug!(event = event.name(), "Sende Event");
        let text = self.format.kodieren(&event)?;
        self.text_senden(&text).await
    }

    async fn recv(&mut self) -> Option<ServerEvent> {
        loop {
            let frame = match self.naechster_frame().await {
                Ok(frame) => frame,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::info!(adresse = %self.adresse, "Relay hat die Verbindung getrennt");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(fehler = %e, "Lesefehler, Verbindung wird als getrennt behandelt");
                    return None;
                }
            };

            match frame {
                TextFrame::Event(event) => {
                    tracing::debug!(event = event.name(), "Event empfangen");
                    return Some(event);
                }
                TextFrame::Ping => {
                    if let Err(e) = self.text_senden(ENGINEIO_PONG).await {
                        tracing::warn!(fehler = %e, "Pong fehlgeschlagen");
                        return None;
                    }
                }
                TextFrame::Geschlossen | TextFrame::Verweigert(_) => {
                    tracing::info!(adresse = %self.adresse, "Relay hat die Sitzung beendet");
                    return None;
                }
                TextFrame::Geoeffnet | TextFrame::Verbunden | TextFrame::Ignoriert => {}
            }
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        if self.format == TextFormat::SocketIo {
            if let Err(e) = self.text_senden(SOCKETIO_DISCONNECT).await {
                tracing::debug!(fehler = %e, "Socket.IO disconnect nicht gesendet");
            }
        }
        self.stream.close(None).await.map_err(ws_fehler)?;
        tracing::info!(adresse = %self.adresse, "WebSocket-Verbindung getrennt");
        Ok(())
    }
}

fn ws_fehler(e: tungstenite::Error) -> io::Error {
    match e {
        tungstenite::Error::Io(e) => e,
        geschlossen @ (tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
            io::Error::new(io::ErrorKind::NotConnected, geschlossen)
        }
        anderes => io::Error::new(io::ErrorKind::Other, anderes),
    }
}
