//! Text-Frames fuer WebSocket-Relays
//!
//! Zwei Formate:
//! - `Json`: jeder Text-Frame ist ein Event `{"event": <name>, "data": {...}}`
//! - `SocketIo`: Socket.IO v5 ueber Engine.IO v4 (`42["name",{...}]`),
//!   so wie das gehostete Relay spricht
//!
//! ## Engine.IO / Socket.IO Pakete (Auszug)
//!
//! ```text
//! 0{...}        Engine.IO open (sid, pingInterval)
//! 1             Engine.IO close
//! 2 / 3         ping / pong
//! 40 / 40{...}  Socket.IO connect (Client) / connect-Bestaetigung (Relay)
//! 41            Socket.IO disconnect
//! 42[...]       Socket.IO event
//! 44{...}       Socket.IO connect_error
//! ```

use std::io;

use serde_json::Value;

use crate::events::{ClientEvent, ServerEvent};

/// Socket.IO connect-Paket fuer den Standard-Namespace
pub const SOCKETIO_CONNECT: &str = "40";
/// Socket.IO disconnect-Paket
pub const SOCKETIO_DISCONNECT: &str = "41";
/// Engine.IO pong
pub const ENGINEIO_PONG: &str = "3";

/// Format der Text-Frames auf einer WebSocket-Verbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Json,
    SocketIo,
}

/// Ergebnis beim Lesen eines Text-Frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFrame {
    /// Ein Relay-Event
    Event(ServerEvent),
    /// Engine.IO ping, muss mit pong beantwortet werden
    Ping,
    /// Engine.IO open-Paket
    Geoeffnet,
    /// Socket.IO connect-Bestaetigung
    Verbunden,
    /// Socket.IO connect_error mit Grund
    Verweigert(String),
    /// Relay hat die Sitzung beendet
    Geschlossen,
    /// Nichts fuer den Client (pong, noop, unbekannte Events)
    Ignoriert,
}

impl TextFormat {
    /// Kodiert ein Client-Event als Text-Frame
    pub fn kodieren(&self, event: &ClientEvent) -> io::Result<String> {
        let wert = serde_json::to_value(event).map_err(ungueltig)?;
        match self {
            Self::Json => serde_json::to_string(&wert).map_err(ungueltig),
            Self::SocketIo => {
                let name = wert.get("event").cloned().unwrap_or(Value::Null);
                let daten = wert.get("data").cloned().unwrap_or(Value::Null);
                let array = serde_json::to_string(&Value::Array(vec![name, daten]))
                    .map_err(ungueltig)?;
                Ok(format!("42{array}"))
            }
        }
    }

    /// Dekodiert einen Text-Frame des Relays
    ///
    /// Unbekannte oder ungueltige Events werden verworfen und protokolliert.
    pub fn dekodieren(&self, text: &str) -> TextFrame {
        match self {
            Self::Json => json_event(text),
            Self::SocketIo => socketio_paket(text),
        }
    }
}

fn json_event(text: &str) -> TextFrame {
    match serde_json::from_str::<ServerEvent>(text) {
        Ok(event) => TextFrame::Event(event),
        Err(e) => {
            tracing::warn!(fehler = %e, bytes = text.len(), "Unbekanntes oder ungueltiges Event verworfen");
            TextFrame::Ignoriert
        }
    }
}

fn socketio_paket(text: &str) -> TextFrame {
    let mut zeichen = text.chars();
    match zeichen.next() {
        Some('0') => TextFrame::Geoeffnet,
        Some('1') => TextFrame::Geschlossen,
        Some('2') => TextFrame::Ping,
        Some('4') => socketio_nachricht(zeichen.as_str()),
        _ => TextFrame::Ignoriert,
    }
}

fn socketio_nachricht(rest: &str) -> TextFrame {
    let mut zeichen = rest.chars();
    match zeichen.next() {
        Some('0') => TextFrame::Verbunden,
        Some('1') => TextFrame::Geschlossen,
        Some('2') => socketio_event(zeichen.as_str()),
        Some('4') => {
            let grund = serde_json::from_str::<Value>(zeichen.as_str())
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| "connect_error".to_string());
            TextFrame::Verweigert(grund)
        }
        _ => TextFrame::Ignoriert,
    }
}

/// `42[<name>, <data>]`, optional mit Ack-ID vor dem Array
fn socketio_event(rest: &str) -> TextFrame {
    let payload = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let array = match serde_json::from_str::<Vec<Value>>(payload) {
        Ok(array) => array,
        Err(e) => {
            tracing::warn!(fehler = %e, "Ungueltiges Socket.IO-Event verworfen");
            return TextFrame::Ignoriert;
        }
    };

    let mut teile = array.into_iter();
    let name = teile.next().unwrap_or(Value::Null);
    let daten = teile.next().unwrap_or_else(|| Value::Object(Default::default()));
    let mut objekt = serde_json::Map::new();
    objekt.insert("event".into(), name);
    objekt.insert("data".into(), daten);

    match serde_json::from_value::<ServerEvent>(Value::Object(objekt)) {
        Ok(event) => TextFrame::Event(event),
        Err(e) => {
            tracing::warn!(fehler = %e, "Unbekanntes oder ungueltiges Event verworfen");
            TextFrame::Ignoriert
        }
    }
}

fn ungueltig(e: serde_json::Error) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("JSON-Serialisierung fehlgeschlagen: {e}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{LoginRequest, LoginSuccess, UserLeft};
    use serde_json::json;
    use worstgen_core::Alias;

    fn login() -> ClientEvent {
        ClientEvent::Login(LoginRequest {
            alias: Alias::parse("zero_cool").unwrap(),
            public_key: "pk".into(),
        })
    }

    #[test]
    fn json_kodieren_ist_event_objekt() {
        let text = TextFormat::Json.kodieren(&login()).unwrap();
        let wert: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            wert,
            json!({ "event": "login", "data": { "alias": "zero_cool", "publicKey": "pk" } })
        );
    }

    #[test]
    fn socketio_kodieren_ist_event_array() {
        let text = TextFormat::SocketIo.kodieren(&login()).unwrap();
        assert!(text.starts_with("42["));
        let wert: Value = serde_json::from_str(&text[2..]).unwrap();
        assert_eq!(wert, json!(["login", { "alias": "zero_cool", "publicKey": "pk" }]));
    }

    #[test]
    fn json_dekodieren() {
        let frame = TextFormat::Json.dekodieren(r#"{"event":"user-left","data":{"alias":"X"}}"#);
        assert_eq!(
            frame,
            TextFrame::Event(ServerEvent::UserLeft(UserLeft { alias: Alias::parse("X").unwrap() }))
        );
        assert_eq!(TextFormat::Json.dekodieren("kein json"), TextFrame::Ignoriert);
    }

    #[test]
    fn socketio_event_dekodieren() {
        let frame = TextFormat::SocketIo.dekodieren(r#"42["login-success",{"history":[]}]"#);
        assert_eq!(frame, TextFrame::Event(ServerEvent::LoginSuccess(LoginSuccess::default())));
    }

    #[test]
    fn socketio_event_ohne_daten_und_mit_ack_id() {
        let frame = TextFormat::SocketIo.dekodieren(r#"4217["login-success"]"#);
        assert_eq!(frame, TextFrame::Event(ServerEvent::LoginSuccess(LoginSuccess::default())));
    }

    #[test]
    fn socketio_steuerpakete() {
        let format = TextFormat::SocketIo;
        assert_eq!(format.dekodieren(r#"0{"sid":"abc","pingInterval":25000}"#), TextFrame::Geoeffnet);
        assert_eq!(format.dekodieren(r#"40{"sid":"xyz"}"#), TextFrame::Verbunden);
        assert_eq!(format.dekodieren("2"), TextFrame::Ping);
        assert_eq!(format.dekodieren("3"), TextFrame::Ignoriert);
        assert_eq!(format.dekodieren("41"), TextFrame::Geschlossen);
        assert_eq!(format.dekodieren("1"), TextFrame::Geschlossen);
        assert_eq!(
            format.dekodieren(r#"44{"message":"Not authorized"}"#),
            TextFrame::Verweigert("Not authorized".into())
        );
    }

    #[test]
    fn socketio_unbekanntes_event_wird_ignoriert() {
        let frame = TextFormat::SocketIo.dekodieren(r#"42["typing",{"alias":"X"}]"#);
        assert_eq!(frame, TextFrame::Ignoriert);
    }
}
