//! Tests fuer Sitzung und Ereignisschleife

mod session_tests;

use std::sync::OnceLock;

use worstgen_auth::AuthOutcome;
use worstgen_core::Alias;
use worstgen_crypto::Identity;
use worstgen_protocol::{DirectoryEntry, HistoryRecord, MemoryChannel, MemoryRelay};

use crate::display::DisplayLog;
use crate::session::ChatSession;

pub(crate) const EIGENER_ALIAS: &str = "zero_cool";

pub(crate) type TestSession = ChatSession<MemoryChannel, DisplayLog>;

fn private_pem(zelle: &'static OnceLock<String>) -> &'static str {
    zelle.get_or_init(|| {
        Identity::generate()
            .and_then(|identity| identity.private_key_pem())
            .expect("Schluessel-Erzeugung fehlgeschlagen")
    })
}

/// Frische Kopie der eigenen Identitaet (Parsen statt Neu-Generieren)
pub(crate) fn eigene_identity() -> Identity {
    static PEM: OnceLock<String> = OnceLock::new();
    Identity::from_private_key_pem(private_pem(&PEM)).unwrap()
}

/// Identitaet eines anderen Teilnehmers
pub(crate) fn fremde_identity() -> &'static Identity {
    static IDENTITY: OnceLock<Identity> = OnceLock::new();
    IDENTITY.get_or_init(|| Identity::generate().unwrap())
}

/// Identitaet eines Dritten, der nichts lesen koennen soll
pub(crate) fn dritte_identity() -> &'static Identity {
    static IDENTITY: OnceLock<Identity> = OnceLock::new();
    IDENTITY.get_or_init(|| Identity::generate().unwrap())
}

pub(crate) fn alias(name: &str) -> Alias {
    Alias::parse(name).unwrap()
}

pub(crate) fn eintrag(name: &str, identity: &Identity) -> DirectoryEntry {
    DirectoryEntry {
        alias: alias(name),
        public_key: identity.public_key_pem().to_string(),
    }
}

pub(crate) fn session_mit(
    directory: Vec<DirectoryEntry>,
    history: Vec<HistoryRecord>,
) -> (TestSession, MemoryRelay) {
    let (channel, relay) = MemoryChannel::pair();
    let outcome = AuthOutcome {
        alias: alias(EIGENER_ALIAS),
        history,
        directory,
        registriert: false,
    };
    let session = ChatSession::neu(outcome, eigene_identity(), channel, DisplayLog::new());
    (session, relay)
}

pub(crate) fn leere_session() -> (TestSession, MemoryRelay) {
    session_mit(Vec::new(), Vec::new())
}
