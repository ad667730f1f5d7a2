//! # worstgen-crypto
//!
//! Hybrid-Verschluesselung fuer Worstgen.
//!
//! ## Module
//! - `identity` - RSA-Schluessel-Paar pro Sitzung (PEM-kodiert)
//! - `e2e` - Envelope versiegeln und oeffnen (AES-256-CBC + RSA-OAEP)
//! - `types` - Gemeinsame Typen und Konstanten
//! - `error` - Fehlertypen

pub mod e2e;
pub mod error;
pub mod identity;
pub mod types;

// Bequeme Re-Exports
pub use error::{CryptoError, CryptoResult};
pub use identity::{parse_public_key, Identity, IDENTITY_KEY_BITS};
pub use types::{RsaPrivateKey, RsaPublicKey, SecretBytes, IV_LEN, KEY_LEN, UNDECRYPTABLE_PLACEHOLDER};

pub use e2e::{open, open_or_placeholder, open_with_key, seal, seal_for_key};
