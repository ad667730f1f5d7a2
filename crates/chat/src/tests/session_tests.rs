//! Unit-Tests fuer die ChatSession

use worstgen_core::Zeitstempel;
use worstgen_crypto::{open_with_key, seal_for_key, UNDECRYPTABLE_PLACEHOLDER};
use worstgen_protocol::{
    ClientEvent, Envelope, ErrorEvent, HistoryRecord, InboundMessage, OutgoingMessage,
    ServerEvent, UserJoined, UserLeft,
};

use super::*;
use crate::display::DisplayEvent;
use crate::types::{Flow, PresenceKind};

fn gesendete_nachrichten(relay: &mut MemoryRelay) -> Vec<OutgoingMessage> {
    relay
        .alle_gesendeten()
        .into_iter()
        .map(|event| match event {
            ClientEvent::Message(nachricht) => nachricht,
            anderes => panic!("Message erwartet, erhalten: {}", anderes.name()),
        })
        .collect()
}

fn eingehend(sender: &str, text: &str, fuer: &Identity, recipient: Option<&str>) -> InboundMessage {
    InboundMessage {
        sender: alias(sender),
        timestamp: Zeitstempel(1_700_000_000_000),
        envelope: seal_for_key(text, fuer.public_key()).unwrap(),
        recipient: recipient.map(alias),
    }
}

// ---------------------------------------------------------------------------
// send
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_quit_schliesst_kanal_ohne_weitere_nachrichten() {
    let (mut session, mut relay) = leere_session();

    let flow = session.send("  /quit  ").await.unwrap();
    assert_eq!(flow, Flow::Beenden);
    assert!(session.ist_geschlossen());
    assert!(session.channel().ist_geschlossen());
    assert_eq!(session.display().events, vec![DisplayEvent::Verlassen]);

    // Nach dem Beenden wird nichts mehr gesendet
    let flow = session.send("noch was").await.unwrap();
    assert_eq!(flow, Flow::Beenden);
    assert!(relay.empfangen().await.is_none());
}

#[tokio::test]
async fn test_leere_zeile_ist_noop() {
    let (mut session, mut relay) = leere_session();

    assert_eq!(session.send("   ").await.unwrap(), Flow::Weiter);
    assert!(relay.alle_gesendeten().is_empty());
    assert!(session.display().events.is_empty());
}

#[tokio::test]
async fn test_ohne_verzeichnis_unter_eigenem_schluessel() {
    let (mut session, mut relay) = leere_session();

    assert_eq!(session.send("hack the planet").await.unwrap(), Flow::Weiter);

    let gesendet = gesendete_nachrichten(&mut relay);
    assert_eq!(gesendet.len(), 1);
    assert!(gesendet[0].recipient.is_none());

    let eigene = eigene_identity();
    let klartext = open_with_key(&gesendet[0].envelope, eigene.private_key()).unwrap();
    assert_eq!(klartext, "hack the planet");

    // Lokales Echo als eigene Nachricht
    let DisplayEvent::Nachricht { sender, text, eigene, .. } = &session.display().events[0] else {
        panic!("Nachricht erwartet");
    };
    assert_eq!(sender.as_str(), EIGENER_ALIAS);
    assert_eq!(text, "hack the planet");
    assert!(*eigene);
}

#[tokio::test]
async fn test_pro_empfaenger_versiegelt() {
    let (mut session, mut relay) = session_mit(
        vec![
            eintrag("acid_burn", fremde_identity()),
            eintrag("cereal_killer", dritte_identity()),
        ],
        Vec::new(),
    );

    session.send("meet at the gibson").await.unwrap();

    let gesendet = gesendete_nachrichten(&mut relay);
    assert_eq!(gesendet.len(), 2);

    let an_acid = gesendet
        .iter()
        .find(|n| n.recipient.as_ref().is_some_and(|r| r == "acid_burn"))
        .expect("Envelope fuer acid_burn");
    assert_eq!(
        open_with_key(&an_acid.envelope, fremde_identity().private_key()).unwrap(),
        "meet at the gibson"
    );
    // Der Dritte kann den Envelope fuer acid_burn nicht oeffnen
    assert!(open_with_key(&an_acid.envelope, dritte_identity().private_key()).is_err());

    let an_cereal = gesendet
        .iter()
        .find(|n| n.recipient.as_ref().is_some_and(|r| r == "cereal_killer"))
        .expect("Envelope fuer cereal_killer");
    assert_eq!(
        open_with_key(&an_cereal.envelope, dritte_identity().private_key()).unwrap(),
        "meet at the gibson"
    );
}

#[tokio::test]
async fn test_senden_nach_trennung_meldet_getrennt() {
    let (mut session, relay) = leere_session();
    drop(relay);

    let flow = session.send("hallo?").await.unwrap();
    assert_eq!(flow, Flow::Getrennt);
    assert!(session.display().events.contains(&DisplayEvent::Getrennt));
}

// ---------------------------------------------------------------------------
// on_message
// ---------------------------------------------------------------------------

#[test]
fn test_nachricht_wird_entschluesselt_und_gespeichert() {
    let (mut session, _relay) = leere_session();
    let nachricht = eingehend("acid_burn", "Mess with the best", &eigene_identity(), None);

    session.on_message(nachricht);

    assert_eq!(session.display().texte(), vec!["Mess with the best"]);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].sender.as_str(), "acid_burn");
}

#[test]
fn test_eigene_nachricht_wird_ignoriert() {
    let (mut session, _relay) = leere_session();
    session.on_message(eingehend(EIGENER_ALIAS, "echo", &eigene_identity(), None));

    assert!(session.display().events.is_empty());
    assert!(session.history().is_empty());
}

#[test]
fn test_nachricht_fuer_anderen_empfaenger_wird_ignoriert() {
    let (mut session, _relay) = leere_session();
    session.on_message(eingehend("acid_burn", "nicht fuer dich", fremde_identity(), Some("cereal_killer")));

    assert!(session.display().events.is_empty());
    assert!(session.history().is_empty());
}

#[test]
fn test_nachricht_an_mich_adressiert() {
    let (mut session, _relay) = leere_session();
    session.on_message(eingehend("acid_burn", "nur fuer dich", &eigene_identity(), Some(EIGENER_ALIAS)));

    assert_eq!(session.display().texte(), vec!["nur fuer dich"]);
}

#[test]
fn test_fremder_schluessel_ergibt_platzhalter() {
    let (mut session, _relay) = leere_session();
    session.on_message(eingehend("acid_burn", "geheim", fremde_identity(), None));

    assert_eq!(session.display().texte(), vec![UNDECRYPTABLE_PLACEHOLDER]);
    // Sitzung laeuft weiter, Eintrag landet trotzdem in der History
    assert_eq!(session.history().len(), 1);
    assert!(!session.ist_geschlossen());
}

// ---------------------------------------------------------------------------
// on_presence / dispatch / on_disconnect
// ---------------------------------------------------------------------------

#[test]
fn test_user_joined_genau_eine_meldung() {
    let (mut session, _relay) = leere_session();

    let flow = session.dispatch(ServerEvent::UserJoined(UserJoined {
        alias: alias("X"),
        public_key: Some(fremde_identity().public_key_pem().to_string()),
    }));

    assert_eq!(flow, Flow::Weiter);
    assert_eq!(session.display().presence_fuer("X"), 1);
    assert_eq!(session.display().events.len(), 1);
    assert!(session.history().is_empty());
    assert!(session.directory().enthaelt(&alias("X")));
}

#[test]
fn test_user_joined_ohne_schluessel() {
    let (mut session, _relay) = leere_session();
    session.on_presence(PresenceKind::Joined, alias("X"), None);

    assert_eq!(session.display().presence_fuer("X"), 1);
    assert!(session.directory().is_empty());
}

#[test]
fn test_user_left_entfernt_schluessel() {
    let (mut session, _relay) = session_mit(vec![eintrag("acid_burn", fremde_identity())], Vec::new());
    assert_eq!(session.directory().len(), 1);

    session.dispatch(ServerEvent::UserLeft(UserLeft {
        alias: alias("acid_burn"),
    }));

    assert!(session.directory().is_empty());
    assert_eq!(
        session.display().events,
        vec![DisplayEvent::Presence {
            art: PresenceKind::Left,
            alias: alias("acid_burn")
        }]
    );
}

#[test]
fn test_server_fehler_wird_statuszeile() {
    let (mut session, _relay) = leere_session();
    session.dispatch(ServerEvent::Error(ErrorEvent {
        message: "Rate limited".into(),
    }));

    assert_eq!(
        session.display().events,
        vec![DisplayEvent::Status("Server error: Rate limited".into())]
    );
}

#[test]
fn test_trennung_meldet_einmal() {
    let (mut session, _relay) = leere_session();

    assert_eq!(session.on_disconnect(), Flow::Getrennt);
    assert_eq!(session.on_disconnect(), Flow::Getrennt);
    assert_eq!(session.display().events, vec![DisplayEvent::Getrennt]);
}

#[tokio::test]
async fn test_empfangen_leitet_weiter() {
    let (mut session, mut relay) = leere_session();
    relay.senden(ServerEvent::Message(eingehend("acid_burn", "ping", &eigene_identity(), None)));

    assert_eq!(session.empfangen().await, Flow::Weiter);
    assert_eq!(session.display().texte(), vec!["ping"]);

    relay.trennen();
    assert_eq!(session.empfangen().await, Flow::Getrennt);
    // Kanal ist nach der Trennung noch offen, nur die Relay-Seite ist weg
    assert!(!session.channel().ist_geschlossen());
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[test]
fn test_history_wiedergabe() {
    let envelope = seal_for_key("aus der history", eigene_identity().public_key()).unwrap();
    let history = vec![
        HistoryRecord {
            sender: alias("acid_burn"),
            timestamp: Zeitstempel(1),
            encrypted_content: envelope.encrypted_content.clone(),
            encrypted_key: Some(envelope.encrypted_key.clone()),
            iv: Some(envelope.iv.clone()),
            recipient: None,
        },
        HistoryRecord {
            sender: alias(EIGENER_ALIAS),
            timestamp: Zeitstempel(2),
            encrypted_content: "0badc0de".into(),
            encrypted_key: None,
            iv: None,
            recipient: None,
        },
    ];
    let (mut session, _relay) = session_mit(Vec::new(), history);
    session.history_anzeigen();

    let events = &session.display().events;
    assert_eq!(events.first(), Some(&DisplayEvent::HistoryStart));
    assert_eq!(events.last(), Some(&DisplayEvent::HistoryEnde));
    assert_eq!(session.display().texte(), vec!["aus der history", "0badc0de"]);

    let DisplayEvent::Nachricht { eigene, .. } = &events[2] else {
        panic!("Nachricht erwartet");
    };
    assert!(*eigene);
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_history_ohne_kopien_fuer_andere_empfaenger() {
    fn record(envelope: Envelope, empfaenger: &str, zeit: i64) -> HistoryRecord {
        HistoryRecord {
            sender: alias("acid_burn"),
            timestamp: Zeitstempel(zeit),
            encrypted_content: envelope.encrypted_content,
            encrypted_key: Some(envelope.encrypted_key),
            iv: Some(envelope.iv),
            recipient: Some(alias(empfaenger)),
        }
    }

    // Eine Nachricht, pro Empfaenger einmal versiegelt
    let history = vec![
        record(seal_for_key("fuer mich", dritte_identity().public_key()).unwrap(), "cereal_killer", 1),
        record(seal_for_key("fuer mich", eigene_identity().public_key()).unwrap(), EIGENER_ALIAS, 1),
    ];
    let (mut session, _relay) = session_mit(Vec::new(), history);
    session.history_anzeigen();

    assert_eq!(session.display().texte(), vec!["fuer mich"]);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].recipient, Some(alias(EIGENER_ALIAS)));
}

#[tokio::test]
async fn test_eingehende_nachrichten_in_lieferreihenfolge() {
    let (mut session, relay) = leere_session();
    let ich = eigene_identity();
    let absender = ["acid_burn", "cereal_killer", "acid_burn", "lord_nikon"];
    for (i, sender) in absender.iter().enumerate() {
        let text = format!("nachricht {i}");
        relay.senden(ServerEvent::Message(eingehend(sender, &text, &ich, None)));
    }

    for _ in 0..absender.len() {
        assert_eq!(session.empfangen().await, Flow::Weiter);
    }

    let erwartet: Vec<String> = (0..absender.len()).map(|i| format!("nachricht {i}")).collect();
    assert_eq!(
        session.display().texte(),
        erwartet.iter().map(String::as_str).collect::<Vec<_>>()
    );
    let reihenfolge: Vec<&str> = session.history().iter().map(|e| e.sender.as_str()).collect();
    assert_eq!(reihenfolge, absender);
}

#[test]
fn test_leere_history_nur_rahmen() {
    let (mut session, _relay) = leere_session();
    session.history_anzeigen();
    assert_eq!(
        session.display().events,
        vec![DisplayEvent::HistoryStart, DisplayEvent::HistoryEnde]
    );
}
