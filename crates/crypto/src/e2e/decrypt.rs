//! Envelope oeffnen
//!
//! Wickelt den Nachrichtenschluessel mit dem eigenen privaten RSA-Schluessel
//! aus und entschluesselt den Inhalt. Jeder Fehler wird als
//! `CryptoError::Entschluesselung` gemeldet; `open_or_placeholder` macht
//! daraus den festen Platzhaltertext.

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use rsa::pkcs8::DecodePrivateKey;
use worstgen_protocol::Envelope;

use crate::e2e::oaep;
use crate::error::{CryptoError, CryptoResult};
use crate::identity::Identity;
use crate::types::{RsaPrivateKey, SecretBytes, IV_LEN, KEY_LEN, UNDECRYPTABLE_PLACEHOLDER};

type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Oeffnet einen Envelope mit einem privaten Schluessel im PKCS#8 PEM-Format
pub fn open(envelope: &Envelope, private_key_pem: &str) -> CryptoResult<String> {
    let private_key = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
        .map_err(|e| CryptoError::Entschluesselung(format!("Privater Schluessel: {e}")))?;
    open_with_key(envelope, &private_key)
}

/// Oeffnet einen Envelope mit einem bereits geparsten privaten Schluessel
pub fn open_with_key(envelope: &Envelope, private_key: &RsaPrivateKey) -> CryptoResult<String> {
    open_inner(envelope, private_key).map_err(|e| match e {
        CryptoError::Entschluesselung(_) => e,
        anderer => CryptoError::Entschluesselung(anderer.to_string()),
    })
}

/// Oeffnet einen Envelope; bei jedem Fehler kommt der Platzhaltertext zurueck
pub fn open_or_placeholder(envelope: &Envelope, identity: &Identity) -> String {
    match open_with_key(envelope, identity.private_key()) {
        Ok(klartext) => klartext,
        Err(e) => {
            tracing::debug!(fehler = %e, "Envelope nicht lesbar, zeige Platzhalter");
            UNDECRYPTABLE_PLACEHOLDER.to_string()
        }
    }
}

fn open_inner(envelope: &Envelope, private_key: &RsaPrivateKey) -> CryptoResult<String> {
    let iv_bytes = hex::decode(&envelope.iv)?;
    let iv: [u8; IV_LEN] = iv_bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::UngueltigerIv {
            erwartet: IV_LEN,
            erhalten: iv_bytes.len(),
        })?;

    let wrapped_key = STANDARD.decode(&envelope.encrypted_key)?;
    let key = SecretBytes::new(
        private_key
            .decrypt(oaep(), &wrapped_key)
            .map_err(|e| CryptoError::Entschluesselung(e.to_string()))?,
    );
    if key.len() != KEY_LEN {
        return Err(CryptoError::UngueltigeSchluesselLaenge {
            erwartet: KEY_LEN,
            erhalten: key.len(),
        });
    }

    let ciphertext = hex::decode(&envelope.encrypted_content)?;
    let klartext = decrypt_aes256cbc(&ciphertext, key.as_bytes(), &iv)?;

    String::from_utf8(klartext)
        .map_err(|e| CryptoError::Entschluesselung(format!("Kein gueltiges UTF-8: {e}")))
}

fn decrypt_aes256cbc(ciphertext: &[u8], key_bytes: &[u8], iv: &[u8; IV_LEN]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256CbcDec::new_from_slices(key_bytes, iv)
        .map_err(|e| CryptoError::Entschluesselung(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|e| CryptoError::Entschluesselung(format!("Padding ungueltig: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
