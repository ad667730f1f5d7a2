//! Anmelde-Zustandsautomat
//!
//! Der Login/Register-Ablauf als expliziter Wert: aktueller Zustand plus
//! Uebergangsfunktion. `Handshake::step` nimmt eine Eingabe entgegen und
//! liefert die Events, die an das Relay gesendet werden muessen. Kein I/O.
//!
//! ```text
//! Connecting -> Authenticating -> Authenticated
//!                              -> RegistrationRequired -> Registering -> Authenticated
//!                              |                       |              -> Failed
//!                              |                       -> Failed (kein Schluessel)
//!                              -> Failed
//! ```

use worstgen_core::{Alias, WorstgenError};
use worstgen_protocol::{
    ClientEvent, DirectoryEntry, HistoryRecord, LoginRequest, RegisterRequest, ServerEvent,
};

/// Standardtext wenn das Relay eine Registrierung ohne Begruendung ablehnt
const REGISTRIERUNG_ABGELEHNT: &str = "Registrierung vom Relay abgelehnt";

/// Zugangsdaten fuer den Handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anmeldedaten {
    pub alias: Alias,
    /// Oeffentlicher Sitzungsschluessel (SPKI PEM)
    pub public_key_pem: String,
    /// Out-of-band verteilter Registrierungsschluessel (nur fuer neue Aliase)
    pub registrierungsschluessel: Option<String>,
}

/// Ergebnis einer erfolgreichen Anmeldung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub alias: Alias,
    /// Bisherige Nachrichten (leer nach einer Registrierung)
    pub history: Vec<HistoryRecord>,
    /// Veroeffentlichte Schluessel der anderen Teilnehmer
    pub directory: Vec<DirectoryEntry>,
    /// `true` wenn der Alias in dieser Sitzung neu registriert wurde
    pub registriert: bool,
}

/// Endgueltige Fehlschlaege des Handshakes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    ConnectFailure { adresse: String, grund: String },
    Rejected(String),
    RegistrationKeyMissing,
    RegistrationFailed(String),
    Disconnected,
}

impl From<AuthFailure> for WorstgenError {
    fn from(fehler: AuthFailure) -> Self {
        match fehler {
            AuthFailure::ConnectFailure { adresse, grund } => {
                WorstgenError::Verbindung { adresse, grund }
            }
            AuthFailure::Rejected(grund) => WorstgenError::Abgelehnt(grund),
            AuthFailure::RegistrationKeyMissing => WorstgenError::RegistrierungsschluesselFehlt,
            AuthFailure::RegistrationFailed(grund) => WorstgenError::RegistrierungFehlgeschlagen(grund),
            AuthFailure::Disconnected => WorstgenError::Getrennt,
        }
    }
}

/// Zustaende des Handshakes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Connecting,
    Authenticating,
    RegistrationRequired,
    Registering,
    Authenticated(AuthOutcome),
    Failed(AuthFailure),
}

impl AuthState {
    /// Endzustaende nehmen keine Eingaben mehr an
    pub fn ist_terminal(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Failed(_))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::RegistrationRequired => "registration-required",
            Self::Registering => "registering",
            Self::Authenticated(_) => "authenticated",
            Self::Failed(_) => "failed",
        }
    }
}

/// Eingaben des Automaten
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthInput {
    /// Kanal ist offen (connect)
    ChannelOpened,
    /// Kanal konnte nicht geoeffnet werden (connect-error)
    ChannelFailed { adresse: String, grund: String },
    /// Event vom Relay
    Server(ServerEvent),
    /// Kanal wurde getrennt (disconnect)
    Disconnected,
}

/// Login/Register-Handshake als Zustandsautomat
#[derive(Debug)]
pub struct Handshake {
    anmeldedaten: Anmeldedaten,
    state: AuthState,
}

impl Handshake {
    pub fn new(anmeldedaten: Anmeldedaten) -> Self {
        Self {
            anmeldedaten,
            state: AuthState::Connecting,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Ergebnis sobald ein Endzustand erreicht ist
    pub fn ergebnis(&self) -> Option<Result<AuthOutcome, AuthFailure>> {
        match &self.state {
            AuthState::Authenticated(outcome) => Some(Ok(outcome.clone())),
            AuthState::Failed(fehler) => Some(Err(fehler.clone())),
            _ => None,
        }
    }

    /// Verarbeitet eine Eingabe und gibt die zu sendenden Events zurueck
    pub fn step(&mut self, eingabe: AuthInput) -> Vec<ClientEvent> {
        let vorher = std::mem::replace(&mut self.state, AuthState::Connecting);
        let vorher_name = vorher.name();
        let (mut neu, mut ausgehend) = self.uebergang(vorher, eingabe);

        // RegistrationRequired wird sofort aufgeloest
        if neu == AuthState::RegistrationRequired {
            tracing::info!(alias = %self.anmeldedaten.alias, "Alias unbekannt, Registrierung erforderlich");
            let (weiter, events) = self.registrierung_entscheiden();
            neu = weiter;
            ausgehend.extend(events);
        }

        if neu.name() != vorher_name {
            tracing::debug!(von = vorher_name, nach = neu.name(), "Handshake-Uebergang");
        }
        self.state = neu;
        ausgehend
    }

    fn uebergang(&self, state: AuthState, eingabe: AuthInput) -> (AuthState, Vec<ClientEvent>) {
        use AuthState::*;

        match (state, eingabe) {
            (state, _) if state.ist_terminal() => (state, Vec::new()),

            (Connecting, AuthInput::ChannelOpened) => (Authenticating, vec![self.login_event()]),
            (Connecting, AuthInput::ChannelFailed { adresse, grund }) => {
                (Failed(AuthFailure::ConnectFailure { adresse, grund }), Vec::new())
            }

            (_, AuthInput::Disconnected) => (Failed(AuthFailure::Disconnected), Vec::new()),

            (Authenticating, AuthInput::Server(ServerEvent::LoginSuccess(erfolg))) => {
                tracing::info!(
                    alias = %self.anmeldedaten.alias,
                    history = erfolg.history.len(),
                    verzeichnis = erfolg.directory.len(),
                    "Login erfolgreich"
                );
                let outcome = AuthOutcome {
                    alias: self.anmeldedaten.alias.clone(),
                    history: erfolg.history,
                    directory: erfolg.directory,
                    registriert: false,
                };
                (Authenticated(outcome), Vec::new())
            }
            (Authenticating, AuthInput::Server(ServerEvent::Error(fehler)))
                if fehler.ist_unbekannter_alias() =>
            {
                (RegistrationRequired, Vec::new())
            }
            (Authenticating, AuthInput::Server(ServerEvent::Error(fehler))) => {
                tracing::warn!(grund = %fehler.message, "Login abgelehnt");
                (Failed(AuthFailure::Rejected(fehler.message)), Vec::new())
            }

            (Registering, AuthInput::Server(ServerEvent::Registered(antwort))) if antwort.success => {
                tracing::info!(alias = %self.anmeldedaten.alias, "Alias registriert");
                let outcome = AuthOutcome {
                    alias: self.anmeldedaten.alias.clone(),
                    history: Vec::new(),
                    directory: Vec::new(),
                    registriert: true,
                };
                (Authenticated(outcome), Vec::new())
            }
            (Registering, AuthInput::Server(ServerEvent::Registered(antwort))) => {
                let grund = antwort
                    .message
                    .unwrap_or_else(|| REGISTRIERUNG_ABGELEHNT.to_string());
                tracing::warn!(grund = %grund, "Registrierung fehlgeschlagen");
                (Failed(AuthFailure::RegistrationFailed(grund)), Vec::new())
            }
            (Registering, AuthInput::Server(ServerEvent::Error(fehler))) => {
                tracing::warn!(grund = %fehler.message, "Fehler waehrend der Registrierung");
                (Failed(AuthFailure::Rejected(fehler.message)), Vec::new())
            }

            (state, eingabe) => {
                tracing::debug!(zustand = state.name(), eingabe = ?eingabe_name(&eingabe), "Eingabe ignoriert");
                (state, Vec::new())
            }
        }
    }

    fn registrierung_entscheiden(&self) -> (AuthState, Vec<ClientEvent>) {
        match &self.anmeldedaten.registrierungsschluessel {
            Some(schluessel) => (
                AuthState::Registering,
                vec![ClientEvent::Register(RegisterRequest {
                    alias: self.anmeldedaten.alias.clone(),
                    public_key: self.anmeldedaten.public_key_pem.clone(),
                    registration_key: schluessel.clone(),
                })],
            ),
            None => {
                tracing::warn!("Kein Registrierungsschluessel vorhanden");
                (AuthState::Failed(AuthFailure::RegistrationKeyMissing), Vec::new())
            }
        }
    }

    fn login_event(&self) -> ClientEvent {
        ClientEvent::Login(LoginRequest {
            alias: self.anmeldedaten.alias.clone(),
            public_key: self.anmeldedaten.public_key_pem.clone(),
        })
    }
}

fn eingabe_name(eingabe: &AuthInput) -> &'static str {
    match eingabe {
        AuthInput::ChannelOpened => "channel-opened",
        AuthInput::ChannelFailed { .. } => "channel-failed",
        AuthInput::Server(event) => event.name(),
        AuthInput::Disconnected => "disconnected",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
