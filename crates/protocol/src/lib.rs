//! worstgen-protocol – Relay-Protokoll-Definitionen
//!
//! Dieses Crate definiert alle Events, die zwischen Client und Relay
//! ausgetauscht werden, die Formate auf der Leitung (WebSocket-Text-Frames,
//! Socket.IO, TCP-Frames) und den abstrakten Duplex-Kanal, ueber den
//! Anmeldung und Chat laufen.

pub mod channel;
pub mod events;
pub mod text;
pub mod verbindung;
pub mod websocket;
pub mod wire;

pub use channel::{MemoryChannel, MemoryRelay, RelayChannel, TcpRelayChannel};
pub use text::{TextFormat, TextFrame};
pub use verbindung::{RelayVerbindung, Transport};
pub use websocket::WebSocketRelayChannel;
pub use events::{
    ClientEvent, DirectoryEntry, Envelope, ErrorEvent, HistoryRecord, InboundMessage,
    LoginRequest, LoginSuccess, OutgoingMessage, RegisterRequest, Registered, ServerEvent,
    UserJoined, UserLeft, UNKNOWN_ALIAS,
};
pub use wire::FrameCodec;
