//! Terminal-Frontend
//!
//! `TerminalDisplay` schreibt Anzeige-Events zeilenweise (stdout im
//! Betrieb). Eingabezeilen liest ein eigener Thread von stdin und reicht
//! sie ueber einen mpsc-Kanal an die Ereignisschleife weiter.

use std::io::{BufRead, Write};

use tokio::sync::mpsc;
use worstgen_chat::{ChatDisplay, DisplayEvent, PresenceKind};
use worstgen_core::{Alias, Result, WorstgenError};

/// Zeilenbasierte Anzeige
pub struct TerminalDisplay<W: Write> {
    ausgabe: W,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::neu(std::io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn neu(ausgabe: W) -> Self {
        Self { ausgabe }
    }

    pub fn ausgabe(&self) -> &W {
        &self.ausgabe
    }

    /// Fragt nach dem Alias (ohne Zeilenumbruch)
    pub fn alias_prompt(&mut self) {
        if let Err(e) = write!(self.ausgabe, "Enter your alias: ").and_then(|_| self.ausgabe.flush()) {
            tracing::debug!(fehler = %e, "Ausgabe fehlgeschlagen");
        }
    }
}

/// Formatiert ein Anzeige-Event als Terminalzeile
pub fn zeile_formatieren(event: &DisplayEvent) -> String {
    match event {
        DisplayEvent::Nachricht {
            sender,
            zeitstempel,
            text,
            ..
        } => format!("{sender} [{}]: {text}", zeitstempel.als_uhrzeit()),
        DisplayEvent::Presence {
            art: PresenceKind::Joined,
            alias,
        } => format!(">> {alias} joined the chat <<"),
        DisplayEvent::Presence {
            art: PresenceKind::Left,
            alias,
        } => format!(">> {alias} left the chat <<"),
        DisplayEvent::Status(text) => text.clone(),
        DisplayEvent::HistoryStart => "\n=== Chat History ===".into(),
        DisplayEvent::HistoryEnde => "====================\n".into(),
        DisplayEvent::Verlassen => "Disconnecting from the Worst Generation network...".into(),
        DisplayEvent::Getrennt => "\nDisconnected from server.".into(),
    }
}

impl<W: Write> ChatDisplay for TerminalDisplay<W> {
    fn anzeigen(&mut self, event: DisplayEvent) {
        let zeile = zeile_formatieren(&event);
        if let Err(e) = writeln!(self.ausgabe, "{zeile}").and_then(|_| self.ausgabe.flush()) {
            tracing::debug!(fehler = %e, "Ausgabe fehlgeschlagen");
        }
    }
}

/// Startet den Lese-Thread fuer Eingabezeilen
///
/// Der Kanal schliesst bei Dateiende oder Lesefehler.
pub fn eingabe_starten<R>(quelle: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for zeile in quelle.lines() {
            match zeile {
                Ok(zeile) => {
                    if tx.send(zeile).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(fehler = %e, "Eingabe nicht lesbar");
                    break;
                }
            }
        }
    });
    rx
}

/// Liest den Alias als naechste Eingabezeile; leer oder Dateiende ist fatal
pub async fn alias_lesen(eingabe: &mut mpsc::UnboundedReceiver<String>) -> Result<Alias> {
    match eingabe.recv().await {
        Some(zeile) => Alias::parse(&zeile),
        None => Err(WorstgenError::LeererAlias),
    }
}
