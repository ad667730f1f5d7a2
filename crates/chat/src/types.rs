//! Oeffentliche Typen fuer die Chat-Sitzung

use worstgen_core::{Alias, Zeitstempel};
use worstgen_protocol::{Envelope, HistoryRecord};

/// Inhalt eines History-Eintrags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Verschluesselt, wird beim Anzeigen geoeffnet
    Envelope(Envelope),
    /// Bereits darstellbarer Text
    Text(String),
}

/// Ein Eintrag der Sitzungs-History (nur anhaengen, Ankunftsreihenfolge)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sender: Alias,
    pub timestamp: Zeitstempel,
    pub payload: Payload,
    /// `None` bei Broadcast bzw. Legacy-Relay
    pub recipient: Option<Alias>,
}

impl HistoryEntry {
    /// `true` wenn der Eintrag an alle oder an `alias` gerichtet ist
    pub fn ist_fuer(&self, alias: &Alias) -> bool {
        self.recipient.as_ref().map_or(true, |empfaenger| empfaenger == alias)
    }
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        let payload = match record.envelope() {
            Some(envelope) => Payload::Envelope(envelope),
            None => Payload::Text(record.encrypted_content),
        };
        Self {
            sender: record.sender,
            timestamp: record.timestamp,
            payload,
            recipient: record.recipient,
        }
    }
}

/// Art eines Presence-Events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Joined,
    Left,
}

/// Ergebnis eines Verarbeitungsschritts der Sitzung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Sitzung laeuft weiter
    Weiter,
    /// Benutzer hat die Sitzung beendet
    Beenden,
    /// Relay hat die Verbindung getrennt
    Getrennt,
}

impl Flow {
    pub fn ist_ende(&self) -> bool {
        !matches!(self, Flow::Weiter)
    }
}
