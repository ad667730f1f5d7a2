//! worstgen-chat – verschluesselte Chat-Sitzung
//!
//! Dieses Crate implementiert:
//! - ChatSession: Senden, Empfangen, Presence, Trennung, History-Wiedergabe
//! - KeyDirectory: oeffentliche Schluessel der anderen Teilnehmer
//! - ChatDisplay-Trait als Schnittstelle zur Anzeige
//! - die Ereignisschleife ueber Relay-Events und Eingabezeilen
//!
//! # Beispiel
//!
//! ```no_run
//! use worstgen_auth::SessionAuthenticator;
//! use worstgen_chat::{chat_ausfuehren, ChatSession, DisplayLog};
//! use worstgen_crypto::Identity;
//! use worstgen_protocol::RelayVerbindung;
//!
//! # async fn beispiel(anmeldedaten: worstgen_auth::Anmeldedaten) -> worstgen_core::Result<()> {
//! let identity = Identity::generate().map_err(|e| worstgen_core::WorstgenError::Krypto(e.to_string()))?;
//! let mut channel = RelayVerbindung::aufbauen("https://worst-generation.onrender.com").await?;
//! let outcome = SessionAuthenticator::default()
//!     .authentifizieren(&mut channel, anmeldedaten)
//!     .await?;
//!
//! let (_tx, mut eingabe) = tokio::sync::mpsc::unbounded_channel();
//! let mut session = ChatSession::neu(outcome, identity, channel, DisplayLog::new());
//! chat_ausfuehren(&mut session, &mut eingabe).await?;
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod display;
pub mod error;
pub mod schleife;
pub mod session;
pub mod types;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use directory::KeyDirectory;
pub use display::{ChatDisplay, DisplayEvent, DisplayLog};
pub use error::{ChatError, ChatResult};
pub use schleife::chat_ausfuehren;
pub use session::{ChatSession, QUIT_SENTINEL};
pub use types::{Flow, HistoryEntry, Payload, PresenceKind};
