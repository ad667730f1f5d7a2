//! Envelope versiegeln
//!
//! ## Format
//! ```text
//! encryptedContent = hex(AES-256-CBC(key, iv, plaintext))
//! encryptedKey     = base64(RSA-OAEP-SHA256(recipient, key))
//! iv               = hex(iv)
//! ```
//!
//! Gewickelt werden die rohen 32 Schluessel-Bytes. Envelopes des alten
//! Node-Clients (der die Hex-Darstellung des Schluessels einwickelt) lassen
//! sich damit nicht oeffnen.

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use worstgen_protocol::Envelope;

use crate::e2e::oaep;
use crate::error::{CryptoError, CryptoResult};
use crate::identity::parse_public_key;
use crate::types::{RsaPublicKey, SecretBytes, IV_LEN, KEY_LEN};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Versiegelt `plaintext` fuer den Besitzer von `recipient_public_key_pem`
pub fn seal(plaintext: &str, recipient_public_key_pem: &str) -> CryptoResult<Envelope> {
    let recipient = parse_public_key(recipient_public_key_pem)?;
    seal_for_key(plaintext, &recipient)
}

/// Versiegelt `plaintext` mit einem bereits geparsten Empfaenger-Schluessel
///
/// Jeder Aufruf zieht einen neuen Schluessel und IV.
pub fn seal_for_key(plaintext: &str, recipient: &RsaPublicKey) -> CryptoResult<Envelope> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    let key = SecretBytes::zufaellig(KEY_LEN);

    let ciphertext = encrypt_aes256cbc(plaintext.as_bytes(), key.as_bytes(), &iv)?;

    let wrapped_key = recipient
        .encrypt(&mut OsRng, oaep(), key.as_bytes())
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    Ok(Envelope {
        encrypted_content: hex::encode(ciphertext),
        encrypted_key: STANDARD.encode(wrapped_key),
        iv: hex::encode(iv),
    })
}

fn encrypt_aes256cbc(plaintext: &[u8], key_bytes: &[u8], iv: &[u8; IV_LEN]) -> CryptoResult<Vec<u8>> {
    if key_bytes.len() != KEY_LEN {
        return Err(CryptoError::UngueltigeSchluesselLaenge {
            erwartet: KEY_LEN,
            erhalten: key_bytes.len(),
        });
    }

    let cipher = Aes256CbcEnc::new_from_slices(key_bytes, iv)
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
