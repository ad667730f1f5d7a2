//! worstgen-client – Bibliotheks-Root
//!
//! Deklariert die Client-Module und stellt den Ablauf einer Sitzung
//! (Verbinden, Anmelden, Chatten) fuer `main` und fuer Tests bereit.

pub mod cli;
pub mod config;
pub mod terminal;

use std::time::Duration;

use tokio::sync::mpsc;
use worstgen_auth::{Anmeldedaten, AuthFailure, SessionAuthenticator};
use worstgen_chat::{chat_ausfuehren, ChatDisplay, ChatSession, DisplayEvent, Flow};
use worstgen_core::{Alias, Result, WorstgenError};
use worstgen_crypto::Identity;
use worstgen_protocol::{RelayChannel, RelayVerbindung};

use cli::Cli;
use config::ClientConfig;
use terminal::{alias_lesen, eingabe_starten, TerminalDisplay};

/// Haelt die Client-Konfiguration zusammen
pub struct Client {
    pub config: ClientConfig,
}

impl Client {
    /// Erstellt einen neuen Client aus der gegebenen Konfiguration
    pub fn neu(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Fuehrt eine komplette Sitzung gegen das konfigurierte Relay aus
    ///
    /// Reihenfolge:
    /// 1. Sitzungsschluessel erzeugen
    /// 2. Verbindung zum Relay (WebSocket/Socket.IO oder TCP)
    /// 3. Alias bestimmen (Konfiguration oder Abfrage)
    /// 4. Login bzw. Registrierung
    /// 5. Chat bis `/quit` oder Trennung
    pub async fn starten(self) -> Result<Flow> {
        let identity = Identity::generate().map_err(|e| WorstgenError::Krypto(e.to_string()))?;
        tracing::info!(fingerprint = %identity.fingerprint(), "Sitzungsschluessel bereit");

        let mut anzeige = TerminalDisplay::stdout();
        let adresse = self.config.verbindung.server.clone();
        let channel = RelayVerbindung::aufbauen(&adresse).await.map_err(|e| {
            WorstgenError::from(AuthFailure::ConnectFailure {
                adresse: adresse.clone(),
                grund: e.to_string(),
            })
        })?;
        anzeige.anzeigen(DisplayEvent::Status(format!("Connected to {adresse}")));

        let mut eingabe = eingabe_starten(std::io::BufReader::new(std::io::stdin()));
        let alias = match &self.config.identitaet.alias {
            Some(alias) => Alias::parse(alias)?,
            None => {
                anzeige.alias_prompt();
                alias_lesen(&mut eingabe).await?
            }
        };

        let anmeldedaten = Anmeldedaten {
            alias,
            public_key_pem: identity.public_key_pem().to_string(),
            registrierungsschluessel: self.config.identitaet.registrierungsschluessel.clone(),
        };

        sitzung_ausfuehren(
            channel,
            anmeldedaten,
            identity,
            self.config.auth_zeitlimit(),
            anzeige,
            &mut eingabe,
        )
        .await
    }
}

/// Laedt die Konfigurationsdatei und wendet die Kommandozeile an
pub fn konfiguration_laden(cli: &Cli) -> Result<ClientConfig> {
    let config = ClientConfig::laden(&cli.config)
        .map_err(|e| WorstgenError::Konfiguration(format!("{e:#}")))?;
    Ok(config.mit_cli(cli))
}

/// Anmeldung und Chat ueber einem bereits offenen Kanal
pub async fn sitzung_ausfuehren<C, D>(
    mut channel: C,
    anmeldedaten: Anmeldedaten,
    identity: Identity,
    zeitlimit: Duration,
    mut anzeige: D,
    eingabe: &mut mpsc::UnboundedReceiver<String>,
) -> Result<Flow>
where
    C: RelayChannel,
    D: ChatDisplay,
{
    let outcome = SessionAuthenticator::neu(zeitlimit)
        .authentifizieren(&mut channel, anmeldedaten)
        .await?;

    let status = if outcome.registriert {
        format!("Registered as {}", outcome.alias)
    } else {
        format!("Logged in as {}", outcome.alias)
    };
    anzeige.anzeigen(DisplayEvent::Status(status));
    anzeige.anzeigen(DisplayEvent::Status(format!(
        "Connected as: {} - type a message and press Enter, {} to exit",
        outcome.alias,
        worstgen_chat::QUIT_SENTINEL
    )));

    let mut session = ChatSession::neu(outcome, identity, channel, anzeige);
    let flow = chat_ausfuehren(&mut session, eingabe).await?;
    tracing::info!(?flow, "Sitzung beendet");
    Ok(flow)
}

/// Meldungen fuer den Benutzer bei einem fatalen Fehler
pub fn fehlermeldung(fehler: &WorstgenError) -> Vec<String> {
    let mut zeilen = vec![format!("Error: {fehler}")];
    match fehler {
        WorstgenError::RegistrierungsschluesselFehlt => zeilen.push(
            "Please run again with --key or -k flag to provide the registration key".into(),
        ),
        fehler if fehler.ist_voruebergehend() => {
            zeilen.push("The relay may be unreachable; check --server and try again".into())
        }
        _ => {}
    }
    zeilen
}
