//! SessionAuthenticator – treibt den Handshake ueber einen RelayChannel
//!
//! Der Zustandsautomat in `handshake` entscheidet, der Authenticator
//! sendet und empfaengt. Der gesamte Handshake laeuft unter einem
//! Zeitlimit.

use std::time::Duration;

use worstgen_core::{Result, WorstgenError};
use worstgen_protocol::RelayChannel;

use crate::handshake::{Anmeldedaten, AuthInput, AuthOutcome, Handshake};

/// Standard-Zeitlimit fuer den kompletten Handshake
pub const STANDARD_ZEITLIMIT: Duration = Duration::from_secs(30);

/// Fuehrt Login bzw. Registrierung gegen das Relay durch
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    zeitlimit: Duration,
}

impl Default for SessionAuthenticator {
    fn default() -> Self {
        Self::neu(STANDARD_ZEITLIMIT)
    }
}

impl SessionAuthenticator {
    pub fn neu(zeitlimit: Duration) -> Self {
        Self { zeitlimit }
    }

    pub fn zeitlimit(&self) -> Duration {
        self.zeitlimit
    }

    /// Meldet `anmeldedaten` ueber einen bereits offenen Kanal an
    ///
    /// Liefert History und Schluesselverzeichnis bei Erfolg. Ein unbekannter
    /// Alias wird mit dem Registrierungsschluessel registriert, sofern einer
    /// vorhanden ist.
    pub async fn authentifizieren<C>(
        &self,
        channel: &mut C,
        anmeldedaten: Anmeldedaten,
    ) -> Result<AuthOutcome>
    where
        C: RelayChannel + ?Sized,
    {
        let alias = anmeldedaten.alias.clone();
        let mut handshake = Handshake::new(anmeldedaten);

        let ergebnis = tokio::time::timeout(self.zeitlimit, treiben(&mut handshake, channel)).await;
        match ergebnis {
            Ok(ergebnis) => ergebnis,
            Err(_) => {
                tracing::warn!(
                    alias = %alias,
                    zustand = ?handshake.state(),
                    sekunden = self.zeitlimit.as_secs(),
                    "Zeitlimit beim Handshake ueberschritten"
                );
                Err(WorstgenError::Zeitlimit(format!(
                    "keine Antwort vom Relay innerhalb von {}s",
                    self.zeitlimit.as_secs()
                )))
            }
        }
    }
}

async fn treiben<C>(handshake: &mut Handshake, channel: &mut C) -> Result<AuthOutcome>
where
    C: RelayChannel + ?Sized,
{
    let mut eingabe = AuthInput::ChannelOpened;

    loop {
        for event in handshake.step(eingabe) {
            let name = event.name();
            if let Err(e) = channel.send(event).await {
                tracing::warn!(event = name, fehler = %e, "Senden waehrend Handshake fehlgeschlagen");
                handshake.step(AuthInput::Disconnected);
                break;
            }
        }

        if let Some(ergebnis) = handshake.ergebnis() {
            return ergebnis.map_err(WorstgenError::from);
        }

        eingabe = match channel.recv().await {
            Some(event) => AuthInput::Server(event),
            None => AuthInput::Disconnected,
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
