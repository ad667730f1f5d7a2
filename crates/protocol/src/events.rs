//! Relay-Events
//!
//! Definiert alle Events die ueber den Duplex-Kanal zwischen Client und
//! Relay ausgetauscht werden.
//!
//! ## Design
//! - Jedes Event ist ein JSON-Objekt `{"event": <name>, "data": {...}}`
//! - Event-Namen in kebab-case (`login-success`, `user-joined`)
//! - Feldnamen in camelCase (`publicKey`, `encryptedContent`)

use serde::{Deserialize, Serialize};
use worstgen_core::{Alias, Zeitstempel};

/// Fehlermeldung des Relays, die den Registrierungs-Ablauf ausloest
pub const UNKNOWN_ALIAS: &str = "Unknown alias";

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Hybrid-verschluesselte Darstellung einer einzelnen Chat-Nachricht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// AES-256-CBC Ciphertext (hex)
    pub encrypted_content: String,
    /// Mit RSA-OAEP eingewickelter Nachrichtenschluessel (base64)
    pub encrypted_key: String,
    /// Initialisierungsvektor (hex, 16 Bytes)
    pub iv: String,
}

// ---------------------------------------------------------------------------
// Client -> Relay
// ---------------------------------------------------------------------------

/// Anmeldung mit einem bestehenden Alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub alias: Alias,
    /// Oeffentlicher Schluessel dieser Sitzung (SPKI PEM)
    pub public_key: String,
}

/// Registrierung eines neuen Alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub alias: Alias,
    pub public_key: String,
    /// Out-of-band verteilter Registrierungsschluessel
    pub registration_key: String,
}

/// Ausgehende verschluesselte Nachricht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    #[serde(flatten)]
    pub envelope: Envelope,
    /// Empfaenger, fuer den der Schluessel eingewickelt wurde (None = Legacy-Broadcast)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Alias>,
}

/// Alle Events die der Client sendet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    Login(LoginRequest),
    Register(RegisterRequest),
    Message(OutgoingMessage),
}

impl ClientEvent {
    /// Event-Name wie auf der Leitung (fuer Logs)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Message(_) => "message",
        }
    }
}

// ---------------------------------------------------------------------------
// Relay -> Client
// ---------------------------------------------------------------------------

/// Eintrag der Nachrichten-History, die nach dem Login geliefert wird
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub sender: Alias,
    pub timestamp: Zeitstempel,
    pub encrypted_content: String,
    #[serde(default)]
    pub encrypted_key: Option<String>,
    #[serde(default)]
    pub iv: Option<String>,
    /// Empfaenger bei pro Empfaenger versiegelten Nachrichten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Alias>,
}

impl HistoryRecord {
    /// Vollstaendiger Envelope, falls Schluessel und IV mitgeliefert wurden
    pub fn envelope(&self) -> Option<Envelope> {
        match (&self.encrypted_key, &self.iv) {
            (Some(encrypted_key), Some(iv)) => Some(Envelope {
                encrypted_content: self.encrypted_content.clone(),
                encrypted_key: encrypted_key.clone(),
                iv: iv.clone(),
            }),
            _ => None,
        }
    }
}

/// Veroeffentlichter Schluessel eines Teilnehmers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub alias: Alias,
    pub public_key: String,
}

/// Erfolgreicher Login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSuccess {
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    /// Alias -> Public-Key Verzeichnis (leer bei Relays ohne Verzeichnis)
    #[serde(default)]
    pub directory: Vec<DirectoryEntry>,
}

/// Antwort auf eine Registrierung
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Fehlermeldung des Relays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
}

impl ErrorEvent {
    /// Exakter Vergleich mit der "Unknown alias" Meldung
    pub fn ist_unbekannter_alias(&self) -> bool {
        self.message == UNKNOWN_ALIAS
    }
}

/// Eingehende Chat-Nachricht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub sender: Alias,
    pub timestamp: Zeitstempel,
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Alias>,
}

/// Ein Teilnehmer ist dem Chat beigetreten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoined {
    pub alias: Alias,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

/// Ein Teilnehmer hat den Chat verlassen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLeft {
    pub alias: Alias,
}

/// Alle Events die der Client empfaengt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    LoginSuccess(LoginSuccess),
    Registered(Registered),
    Error(ErrorEvent),
    Message(InboundMessage),
    UserJoined(UserJoined),
    UserLeft(UserLeft),
}

impl ServerEvent {
    /// Event-Name wie auf der Leitung (fuer Logs)
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSuccess(_) => "login-success",
            Self::Registered(_) => "registered",
            Self::Error(_) => "error",
            Self::Message(_) => "message",
            Self::UserJoined(_) => "user-joined",
            Self::UserLeft(_) => "user-left",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
