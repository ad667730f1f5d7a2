//! Fehlertypen fuer Worstgen
//!
//! Zentraler Fehler-Enum fuer alle Zustaende, die den Client beenden.
//! Bibliotheks-Crates geben diese Fehler nach oben weiter; nur das
//! Client-Binary entscheidet ueber den Exit-Code.

use thiserror::Error;

/// Globaler Result-Alias fuer Worstgen
pub type Result<T> = std::result::Result<T, WorstgenError>;

/// Alle fatalen Fehler des Clients
#[derive(Debug, Error)]
pub enum WorstgenError {
    // --- Verbindung & Netzwerk ---
    #[error("Verbindung zu {adresse} fehlgeschlagen: {grund}")]
    Verbindung { adresse: String, grund: String },

    #[error("Verbindung waehrend der Anmeldung getrennt")]
    Getrennt,

    #[error("Zeitlimit ueberschritten: {0}")]
    Zeitlimit(String),

    // --- Authentifizierung ---
    #[error("Anmeldung abgelehnt: {0}")]
    Abgelehnt(String),

    #[error("Registrierungsschluessel fuer neue Aliase erforderlich")]
    RegistrierungsschluesselFehlt,

    #[error("Registrierung fehlgeschlagen: {0}")]
    RegistrierungFehlgeschlagen(String),

    #[error("Alias darf nicht leer sein")]
    LeererAlias,

    // --- Sonstiges ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Kryptografie-Fehler: {0}")]
    Krypto(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

impl WorstgenError {
    /// Exit-Code, mit dem der Prozess bei diesem Fehler endet
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Gibt true zurueck wenn der Fehler vermutlich voruebergehend ist
    ///
    /// Es wird trotzdem nie automatisch wiederholt; das Flag steuert nur
    /// den Hinweis an den Benutzer.
    pub fn ist_voruebergehend(&self) -> bool {
        matches!(
            self,
            Self::Verbindung { .. } | Self::Getrennt | Self::Zeitlimit(_) | Self::Io(_)
        )
    }
}
