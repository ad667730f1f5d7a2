//! # worstgen-observability
//!
//! Structured Logging fuer den Worstgen-Client via tracing-subscriber
//! (Text oder JSON, immer nach stderr).

pub mod logging;

pub use logging::{logging_initialisieren, LogEinstellungen, LogFormat};
