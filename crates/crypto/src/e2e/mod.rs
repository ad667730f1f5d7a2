//! E2E Verschluesselung (End-to-End)
//!
//! Client <-> Client Verschluesselung. Das Relay leitet Envelopes nur
//! weiter und kann den Inhalt nicht lesen.
//!
//! ## Ablauf
//! 1. Jeder Client erzeugt pro Start eine `Identity` (RSA-2048)
//! 2. Pro Nachricht: frischer 32-Byte Schluessel + 16-Byte IV
//! 3. Inhalt mit AES-256-CBC (PKCS#7) verschluesseln, hex-kodiert
//! 4. Die rohen 32 Schluessel-Bytes mit RSA-OAEP (SHA-256) fuer den
//!    Empfaenger einwickeln, base64-kodiert

pub mod decrypt;
pub mod encrypt;

pub use decrypt::{open, open_or_placeholder, open_with_key};
pub use encrypt::{seal, seal_for_key};

use rsa::Oaep;
use sha2::Sha256;

/// OAEP-Parameter fuer den Key-Wrap (SHA-256, leeres Label)
pub(crate) fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}
