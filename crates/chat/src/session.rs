//! ChatSession – authentifizierte Sitzung
//!
//! Versiegelt ausgehende Zeilen, oeffnet eingehende Envelopes und leitet
//! Presence-Events an die Anzeige weiter. Ausgehende Nachrichten werden pro
//! bekanntem Empfaenger versiegelt; ohne Verzeichnis wird einmal unter dem
//! eigenen Schluessel versiegelt und ohne `recipient` gesendet.

use worstgen_auth::AuthOutcome;
use worstgen_core::{Alias, Zeitstempel};
use worstgen_crypto::{open_or_placeholder, seal_for_key, Identity};
use worstgen_protocol::{ClientEvent, InboundMessage, OutgoingMessage, RelayChannel, ServerEvent};

use crate::directory::KeyDirectory;
use crate::display::{ChatDisplay, DisplayEvent};
use crate::error::ChatResult;
use crate::types::{Flow, HistoryEntry, Payload, PresenceKind};

/// Eingabezeile, die die Sitzung beendet
pub const QUIT_SENTINEL: &str = "/quit";

/// Authentifizierte Chat-Sitzung ueber einem `RelayChannel`
pub struct ChatSession<C, D> {
    alias: Alias,
    identity: Identity,
    channel: C,
    display: D,
    history: Vec<HistoryEntry>,
    directory: KeyDirectory,
    geschlossen: bool,
}

impl<C: RelayChannel, D: ChatDisplay> ChatSession<C, D> {
    /// Erstellt die Sitzung aus dem Ergebnis des Handshakes
    pub fn neu(outcome: AuthOutcome, identity: Identity, channel: C, display: D) -> Self {
        let directory = KeyDirectory::aus_eintraegen(outcome.alias.clone(), outcome.directory);
        // Wie live: Kopien fuer andere Empfaenger gehoeren nicht in die History
        let history: Vec<HistoryEntry> = outcome
            .history
            .into_iter()
            .map(HistoryEntry::from)
            .filter(|entry| entry.ist_fuer(&outcome.alias))
            .collect();
        tracing::info!(
            alias = %outcome.alias,
            history = history.len(),
            empfaenger = directory.len(),
            "Chat-Sitzung gestartet"
        );

        Self {
            alias: outcome.alias,
            identity,
            channel,
            display,
            history,
            directory,
            geschlossen: false,
        }
    }

    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn directory(&self) -> &KeyDirectory {
        &self.directory
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// `true` nach `/quit` oder Trennung
    pub fn ist_geschlossen(&self) -> bool {
        self.geschlossen
    }

    /// Zeigt die beim Login erhaltene History an
    ///
    /// Vollstaendige Envelopes werden geoeffnet (Platzhalter bei Fehler),
    /// alles andere wird roh angezeigt. An andere Empfaenger adressierte
    /// Eintraege sind schon beim Start aussortiert.
    pub fn history_anzeigen(&mut self) {
        self.display.anzeigen(DisplayEvent::HistoryStart);
        for entry in &self.history {
            let text = match &entry.payload {
                Payload::Envelope(envelope) => open_or_placeholder(envelope, &self.identity),
                Payload::Text(text) => text.clone(),
            };
            self.display.anzeigen(DisplayEvent::Nachricht {
                sender: entry.sender.clone(),
                zeitstempel: entry.timestamp,
                text,
                eigene: entry.sender == self.alias,
            });
        }
        self.display.anzeigen(DisplayEvent::HistoryEnde);
    }

    /// Verarbeitet eine Eingabezeile
    pub async fn send(&mut self, zeile: &str) -> ChatResult<Flow> {
        if self.geschlossen {
            return Ok(Flow::Beenden);
        }

        let nachricht = zeile.trim();
        if nachricht == QUIT_SENTINEL {
            return Ok(self.beenden().await);
        }
        if nachricht.is_empty() {
            return Ok(Flow::Weiter);
        }

        for ausgehend in self.versiegeln(nachricht)? {
            if let Err(e) = self.channel.send(ClientEvent::Message(ausgehend)).await {
                tracing::warn!(fehler = %e, "Senden fehlgeschlagen, Verbindung verloren");
                return Ok(self.on_disconnect());
            }
        }

        self.display.anzeigen(DisplayEvent::Nachricht {
            sender: self.alias.clone(),
            zeitstempel: Zeitstempel::jetzt(),
            text: nachricht.to_string(),
            eigene: true,
        });
        Ok(Flow::Weiter)
    }

    fn versiegeln(&self, nachricht: &str) -> ChatResult<Vec<OutgoingMessage>> {
        if self.directory.is_empty() {
            let envelope = seal_for_key(nachricht, self.identity.public_key())?;
            return Ok(vec![OutgoingMessage {
                envelope,
                recipient: None,
            }]);
        }

        let mut ausgehend = Vec::with_capacity(self.directory.len());
        for (empfaenger, schluessel) in self.directory.iter() {
            ausgehend.push(OutgoingMessage {
                envelope: seal_for_key(nachricht, schluessel)?,
                recipient: Some(empfaenger.clone()),
            });
        }
        tracing::debug!(empfaenger = ausgehend.len(), "Nachricht pro Empfaenger versiegelt");
        Ok(ausgehend)
    }

    async fn beenden(&mut self) -> Flow {
        self.display.anzeigen(DisplayEvent::Verlassen);
        self.geschlossen = true;
        if let Err(e) = self.channel.close().await {
            tracing::warn!(fehler = %e, "Kanal konnte nicht sauber geschlossen werden");
        }
        tracing::info!(alias = %self.alias, "Sitzung beendet");
        Flow::Beenden
    }

    /// Eingehende Chat-Nachricht
    pub fn on_message(&mut self, nachricht: InboundMessage) {
        if nachricht.sender == self.alias {
            tracing::trace!("Eigene Nachricht ignoriert");
            return;
        }
        if let Some(empfaenger) = &nachricht.recipient {
            if empfaenger != &self.alias {
                tracing::trace!(empfaenger = %empfaenger, "Nachricht fuer anderen Empfaenger ignoriert");
                return;
            }
        }

        let text = open_or_placeholder(&nachricht.envelope, &self.identity);
        self.display.anzeigen(DisplayEvent::Nachricht {
            sender: nachricht.sender.clone(),
            zeitstempel: nachricht.timestamp,
            text,
            eigene: false,
        });
        self.history.push(HistoryEntry {
            sender: nachricht.sender,
            timestamp: nachricht.timestamp,
            payload: Payload::Envelope(nachricht.envelope),
            recipient: nachricht.recipient,
        });
    }

    /// Beitritt oder Austritt eines Teilnehmers; die History bleibt unveraendert
    pub fn on_presence(&mut self, art: PresenceKind, alias: Alias, public_key_pem: Option<&str>) {
        match art {
            PresenceKind::Joined => {
                if let Some(pem) = public_key_pem {
                    self.directory.einfuegen(alias.clone(), pem);
                }
            }
            PresenceKind::Left => {
                self.directory.entfernen(&alias);
            }
        }
        self.display.anzeigen(DisplayEvent::Presence { art, alias });
    }

    /// Relay hat getrennt
    pub fn on_disconnect(&mut self) -> Flow {
        if !self.geschlossen {
            self.geschlossen = true;
            self.display.anzeigen(DisplayEvent::Getrennt);
            tracing::info!(alias = %self.alias, "Vom Relay getrennt");
        }
        Flow::Getrennt
    }

    /// Leitet ein Server-Event an den passenden Handler
    pub fn dispatch(&mut self, event: ServerEvent) -> Flow {
        match event {
            ServerEvent::Message(nachricht) => self.on_message(nachricht),
            ServerEvent::UserJoined(joined) => {
                self.on_presence(PresenceKind::Joined, joined.alias, joined.public_key.as_deref())
            }
            ServerEvent::UserLeft(left) => self.on_presence(PresenceKind::Left, left.alias, None),
            ServerEvent::Error(fehler) => {
                tracing::warn!(grund = %fehler.message, "Fehler vom Relay");
                self.display
                    .anzeigen(DisplayEvent::Status(format!("Server error: {}", fehler.message)));
            }
            anderes => {
                tracing::debug!(event = anderes.name(), "Event nach Anmeldung ignoriert");
            }
        }
        Flow::Weiter
    }

    /// Wartet auf das naechste Relay-Event und verarbeitet es
    pub async fn empfangen(&mut self) -> Flow {
        match self.channel.recv().await {
            Some(event) => self.dispatch(event),
            None => self.on_disconnect(),
        }
    }
}
