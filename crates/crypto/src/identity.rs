//! Sitzungs-Identitaet (RSA)
//!
//! Jeder Programmstart erzeugt ein frisches RSA-Schluessel-Paar. Der
//! oeffentliche Schluessel (SPKI PEM) wird beim Login an das Relay
//! geschickt, der private Schluessel verlaesst den Prozess nie und wird
//! nicht gespeichert.

use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, CryptoResult};
use crate::types::{RsaPrivateKey, RsaPublicKey};

/// Mindest-Modulusgroesse der Sitzungsschluessel in Bit
pub const IDENTITY_KEY_BITS: usize = 2048;

/// RSA-Identitaet einer Sitzung
pub struct Identity {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
    /// SPKI PEM, so wie er an das Relay geht
    public_key_pem: String,
}

impl Identity {
    /// Generiert ein neues Schluessel-Paar mit `IDENTITY_KEY_BITS`
    pub fn generate() -> CryptoResult<Self> {
        Self::generate_with_bits(IDENTITY_KEY_BITS)
    }

    /// Generiert ein neues Schluessel-Paar mit mindestens 2048 Bit
    pub fn generate_with_bits(bits: usize) -> CryptoResult<Self> {
        if bits < IDENTITY_KEY_BITS {
            return Err(CryptoError::SchluesselGenerierung(format!(
                "Modulus zu klein: {bits} Bit (Minimum: {IDENTITY_KEY_BITS})"
            )));
        }

        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
        let identity = Self::from_private_key(private_key)?;
        tracing::debug!(bits, fingerprint = %identity.fingerprint(), "Sitzungsschluessel erzeugt");
        Ok(identity)
    }

    /// Erstellt eine Identity aus einem PKCS#8 PEM
    pub fn from_private_key_pem(pem: &str) -> CryptoResult<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?;
        Self::from_private_key(private_key)
    }

    fn from_private_key(private_key: RsaPrivateKey) -> CryptoResult<Self> {
        let public_key = RsaPublicKey::from(&private_key);
        let public_key_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
        Ok(Self {
            private_key,
            public_key,
            public_key_pem,
        })
    }

    /// Oeffentlicher Schluessel als SPKI PEM
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// Privater Schluessel als PKCS#8 PEM
    pub fn private_key_pem(&self) -> CryptoResult<String> {
        let pem = self
            .private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?;
        Ok(pem.as_str().to_owned())
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Kurzer Fingerprint fuer Logs: SHA-256 ueber SPKI DER, erste 16 Bytes hex
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.public_key)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identity {{ fingerprint: {} }}", self.fingerprint())
    }
}

/// Liest einen oeffentlichen Schluessel (SPKI PEM)
pub fn parse_public_key(pem: &str) -> CryptoResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem.trim())
        .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))
}

/// SHA-256 Fingerprint eines oeffentlichen Schluessels (erste 16 Bytes, hex)
pub fn fingerprint(public_key: &RsaPublicKey) -> String {
    match public_key.to_public_key_der() {
        Ok(der) => {
            let hash = Sha256::digest(der.as_bytes());
            hex::encode(&hash[..16])
        }
        Err(_) => "unbekannt".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
