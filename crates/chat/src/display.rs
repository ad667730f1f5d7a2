//! Anzeige-Schnittstelle
//!
//! Die Sitzung rendert nichts selbst, sie meldet `DisplayEvent`s an einen
//! `ChatDisplay`. Das Terminal-Frontend lebt im Client-Binary.

use worstgen_core::{Alias, Zeitstempel};

use crate::types::PresenceKind;

/// Alles, was die Sitzung anzeigen laesst
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Chat-Nachricht (eigene oder fremde)
    Nachricht {
        sender: Alias,
        zeitstempel: Zeitstempel,
        text: String,
        eigene: bool,
    },
    /// Jemand ist beigetreten oder hat den Chat verlassen
    Presence { art: PresenceKind, alias: Alias },
    /// Freie Statuszeile
    Status(String),
    /// Beginn der History-Wiedergabe
    HistoryStart,
    /// Ende der History-Wiedergabe
    HistoryEnde,
    /// Benutzer verlaesst den Chat (`/quit`)
    Verlassen,
    /// Relay hat die Verbindung getrennt
    Getrennt,
}

/// Empfaenger der Anzeige-Events
pub trait ChatDisplay {
    fn anzeigen(&mut self, event: DisplayEvent);
}

impl<D: ChatDisplay + ?Sized> ChatDisplay for &mut D {
    fn anzeigen(&mut self, event: DisplayEvent) {
        (**self).anzeigen(event);
    }
}

/// Sammelt alle Events in einer Liste (Tests, Nachbearbeitung)
#[derive(Debug, Default)]
pub struct DisplayLog {
    pub events: Vec<DisplayEvent>,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alle angezeigten Nachrichtentexte in Reihenfolge
    pub fn texte(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Nachricht { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Anzahl der Presence-Events fuer `alias`
    pub fn presence_fuer(&self, alias: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DisplayEvent::Presence { alias: a, .. } if a == alias))
            .count()
    }
}

impl ChatDisplay for DisplayLog {
    fn anzeigen(&mut self, event: DisplayEvent) {
        self.events.push(event);
    }
}
