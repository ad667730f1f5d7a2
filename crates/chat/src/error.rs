//! Fehlertypen fuer das Chat-Crate

use thiserror::Error;
use worstgen_core::WorstgenError;
use worstgen_crypto::CryptoError;

/// Chat-Fehlertypen
///
/// Entschluesselungsfehler tauchen hier nie auf, sie werden in der Sitzung
/// durch den Platzhaltertext ersetzt.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Versiegeln fehlgeschlagen: {0}")]
    Versiegeln(#[from] CryptoError),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl From<ChatError> for WorstgenError {
    fn from(fehler: ChatError) -> Self {
        WorstgenError::Krypto(fehler.to_string())
    }
}
