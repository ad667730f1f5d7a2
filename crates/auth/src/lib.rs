//! worstgen-auth – Anmeldung am Relay
//!
//! Dieses Crate implementiert:
//! - den Login/Register-Handshake als Zustandsautomat (`Handshake`)
//! - den `SessionAuthenticator`, der den Automaten ueber einen
//!   `RelayChannel` mit Zeitlimit ausfuehrt

pub mod handshake;
pub mod service;

// Bequeme Re-Exporte
pub use handshake::{Anmeldedaten, AuthFailure, AuthInput, AuthOutcome, AuthState, Handshake};
pub use service::{SessionAuthenticator, STANDARD_ZEITLIMIT};
