//! Gemeinsame Typen fuer das Kryptografie-Subsystem

pub use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Laenge des AES-CBC Initialisierungsvektors in Bytes
pub const IV_LEN: usize = 16;

/// Laenge des Nachrichtenschluessels in Bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Anzeigetext fuer Nachrichten, die nicht entschluesselt werden koennen
pub const UNDECRYPTABLE_PLACEHOLDER: &str = "[encrypted message - cannot decrypt]";

/// Sicherer Schluessel-Container (wird beim Drop genullt)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Erzeugt `len` zufaellige Bytes aus dem OS-Zufallsgenerator
    pub fn zufaellig(len: usize) -> Self {
        use rand::RngCore;

        let mut bytes = vec![0u8; len];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
