//! Duplex-Kanal zum Relay
//!
//! Anmeldung und Chat sprechen nur mit dem `RelayChannel`-Trait. Die
//! konkrete Leitung (WebSocket, TCP mit `FrameCodec`, In-Memory fuer
//! Tests) ist austauschbar.
//!
//! Verbindungssignale:
//! - connect: `RelayVerbindung::aufbauen` liefert `Ok`
//! - connect-error: `RelayVerbindung::aufbauen` liefert `Err`
//! - disconnect: `recv()` liefert `None`

use std::io;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;

use crate::events::{ClientEvent, ServerEvent};
use crate::wire::FrameCodec;

/// Bidirektionaler Event-Kanal zum Relay
#[async_trait]
pub trait RelayChannel: Send {
    /// Sendet ein Event an das Relay
    async fn send(&mut self, event: ClientEvent) -> io::Result<()>;

    /// Wartet auf das naechste Event; `None` bedeutet Verbindung getrennt
    async fn recv(&mut self) -> Option<ServerEvent>;

    /// Schliesst die Verbindung
    async fn close(&mut self) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// TcpRelayChannel
// ---------------------------------------------------------------------------

/// TCP-Verbindung zum Relay (u32 BE length + JSON pro Event)
pub struct TcpRelayChannel {
    framed: Framed<TcpStream, FrameCodec<ServerEvent, ClientEvent>>,
    adresse: String,
}

impl TcpRelayChannel {
    /// Baut eine TCP-Verbindung zu `host:port` auf
    pub async fn connect(ziel: &str) -> io::Result<Self> {
        tracing::info!(adresse = %ziel, "Verbinde mit Relay");
        let stream = TcpStream::connect(ziel).await?;
        stream.set_nodelay(true)?;
        tracing::info!(adresse = %ziel, "TCP-Verbindung hergestellt");

        Ok(Self {
            framed: Framed::new(stream, FrameCodec::new()),
            adresse: ziel.to_string(),
        })
    }

    pub fn adresse(&self) -> &str {
        &self.adresse
    }
}

#[async_trait]
impl RelayChannel for TcpRelayChannel {
    async fn send(&mut self, event: ClientEvent) -> io::Result<()> {
        tracing::debug!(event = event.name(), "Sende Event");
        self.framed.send(event).await
    }

    async fn recv(&mut self) -> Option<ServerEvent> {
        match self.framed.next().await {
            Some(Ok(event)) => {
                tracing::debug!(event = event.name(), "Event empfangen");
                Some(event)
            }
            Some(Err(e)) => {
                tracing::warn!(fehler = %e, "Lesefehler, Verbindung wird als getrennt behandelt");
                None
            }
            None => {
                tracing::info!(adresse = %self.adresse, "Relay hat die Verbindung getrennt");
                None
            }
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        self.framed.close().await?;
        tracing::info!(adresse = %self.adresse, "TCP-Verbindung getrennt");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryChannel
// ---------------------------------------------------------------------------

/// In-Process Kanal; die Gegenseite (`MemoryRelay`) spielt das Relay
pub struct MemoryChannel {
    zum_relay: Option<mpsc::UnboundedSender<ClientEvent>>,
    vom_relay: mpsc::UnboundedReceiver<ServerEvent>,
}

/// Relay-Seite eines `MemoryChannel`
pub struct MemoryRelay {
    zum_client: Option<mpsc::UnboundedSender<ServerEvent>>,
    vom_client: mpsc::UnboundedReceiver<ClientEvent>,
}

impl MemoryChannel {
    /// Erstellt ein verbundenes Paar aus Client- und Relay-Seite
    pub fn pair() -> (MemoryChannel, MemoryRelay) {
        let (client_tx, client_rx) = mpsc::unbounded_channel();
        let (relay_tx, relay_rx) = mpsc::unbounded_channel();
        (
            MemoryChannel {
                zum_relay: Some(client_tx),
                vom_relay: relay_rx,
            },
            MemoryRelay {
                zum_client: Some(relay_tx),
                vom_client: client_rx,
            },
        )
    }

    /// `true` nachdem `close()` aufgerufen wurde
    pub fn ist_geschlossen(&self) -> bool {
        self.zum_relay.is_none()
    }
}

#[async_trait]
impl RelayChannel for MemoryChannel {
    async fn send(&mut self, event: ClientEvent) -> io::Result<()> {
        let tx = self
            .zum_relay
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Kanal geschlossen"))?;
        tx.send(event)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "Relay-Seite getrennt"))
    }

    async fn recv(&mut self) -> Option<ServerEvent> {
        self.vom_relay.recv().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.zum_relay = None;
        self.vom_relay.close();
        Ok(())
    }
}

impl MemoryRelay {
    /// Sendet ein Event an den Client (ignoriert, wenn der Client weg ist)
    pub fn senden(&self, event: ServerEvent) {
        if let Some(tx) = &self.zum_client {
            let _ = tx.send(event);
        }
    }

    /// Naechstes Event vom Client; `None` wenn der Client geschlossen hat
    pub async fn empfangen(&mut self) -> Option<ClientEvent> {
        self.vom_client.recv().await
    }

    /// Alle bisher gesendeten Events ohne zu warten
    pub fn alle_gesendeten(&mut self) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.vom_client.try_recv() {
            events.push(event);
        }
        events
    }

    /// Simuliert einen Verbindungsabbruch durch das Relay
    pub fn trennen(&mut self) {
        self.zum_client = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
