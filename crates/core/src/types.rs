//! Gemeinsame Typen fuer Worstgen
//!
//! Newtype-Pattern fuer Aliase und Zeitstempel, damit rohe Strings und
//! Zahlen nicht versehentlich verwechselt werden.

use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorstgenError};

/// Alias eines Teilnehmers (auf dem Server eindeutig, Gross-/Kleinschreibung zaehlt)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alias(String);

impl Alias {
    /// Erstellt einen Alias aus einer Benutzereingabe
    ///
    /// Umgebende Leerzeichen werden entfernt; eine leere Eingabe ist ein
    /// fataler Fehler.
    pub fn parse(eingabe: &str) -> Result<Self> {
        let getrimmt = eingabe.trim();
        if getrimmt.is_empty() {
            return Err(WorstgenError::LeererAlias);
        }
        Ok(Self(getrimmt.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Alias {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Alias {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Zeitstempel in Millisekunden seit Unix-Epoch (Wire-Format des Relays)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zeitstempel(pub i64);

impl Zeitstempel {
    /// Aktueller Zeitpunkt
    pub fn jetzt() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Lokale Uhrzeit fuer die Anzeige (HH:MM:SS)
    ///
    /// Ungueltige Werte werden als `--:--:--` dargestellt.
    pub fn als_uhrzeit(&self) -> String {
        match Local.timestamp_millis_opt(self.0).single() {
            Some(zeit) => zeit.format("%H:%M:%S").to_string(),
            None => "--:--:--".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_wird_getrimmt() {
        let alias = Alias::parse("  zero_cool \n").unwrap();
        assert_eq!(alias.as_str(), "zero_cool");
    }

    #[test]
    fn leerer_alias_ist_fehler() {
        assert!(matches!(Alias::parse("   "), Err(WorstgenError::LeererAlias)));
        assert!(matches!(Alias::parse(""), Err(WorstgenError::LeererAlias)));
    }

    #[test]
    fn alias_beachtet_gross_kleinschreibung() {
        let a = Alias::parse("Neo").unwrap();
        let b = Alias::parse("neo").unwrap();
        assert_ne!(a, b);
        assert!(a == "Neo");
    }

    #[test]
    fn alias_ist_serde_transparent() {
        let alias = Alias::parse("trinity").unwrap();
        let json = serde_json::to_string(&alias).unwrap();
        assert_eq!(json, "\"trinity\"");
        let zurueck: Alias = serde_json::from_str(&json).unwrap();
        assert_eq!(zurueck, alias);
    }

    #[test]
    fn zeitstempel_uhrzeit_format() {
        let ts = Zeitstempel(1_700_000_000_000);
        let uhrzeit = ts.als_uhrzeit();
        assert_eq!(uhrzeit.len(), 8);
        assert_eq!(uhrzeit.matches(':').count(), 2);
    }

    #[test]
    fn zeitstempel_ungueltig() {
        assert_eq!(Zeitstempel(i64::MAX).als_uhrzeit(), "--:--:--");
    }

    #[test]
    fn zeitstempel_jetzt_ist_positiv() {
        assert!(Zeitstempel::jetzt().millis() > 0);
    }
}
