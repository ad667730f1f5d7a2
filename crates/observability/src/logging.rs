//! Structured Logging Setup via tracing-subscriber
//!
//! Logs gehen nach stderr, stdout gehoert der Chat-Ansicht.
//!
//! Konfigurierbar per Umgebungsvariable (ueberschreibt die Konfigurationsdatei):
//! - `WORSTGEN_LOG_LEVEL`: Filter im `EnvFilter`-Format, Standard: warn
//! - `WORSTGEN_LOG_FORMAT`: Format (text/json), Standard: text

use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "WORSTGEN_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "WORSTGEN_LOG_FORMAT";

pub const STANDARD_LEVEL: &str = "warn";

/// Ausgabeformat der Logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            anderes => Err(format!("Unbekanntes Log-Format: {anderes}")),
        }
    }
}

/// Wirksame Logging-Einstellungen nach Anwendung der Umgebung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEinstellungen {
    pub level: String,
    pub format: LogFormat,
}

impl LogEinstellungen {
    /// Wendet Umgebungs-Overrides auf die konfigurierten Werte an
    ///
    /// `env` liefert den Wert einer Variable (in Produktion `std::env::var`).
    /// Ein ungueltiges Format faellt auf `text` zurueck.
    pub fn aufloesen<F>(level: &str, format: &str, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = env(ENV_LOG_LEVEL)
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| level.to_string());
        let format_text = env(ENV_LOG_FORMAT).unwrap_or_else(|| format.to_string());
        let format = format_text.parse().unwrap_or_default();

        Self { level, format }
    }

    /// Filter fuer den Subscriber; ungueltige Ausdruecke fallen auf `warn` zurueck
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new(STANDARD_LEVEL))
    }
}

/// Initialisiert das Logging-System.
///
/// Liest `WORSTGEN_LOG_LEVEL` und `WORSTGEN_LOG_FORMAT` aus der Umgebung.
/// Ein zweiter Aufruf ist wirkungslos.
pub fn logging_initialisieren(level: &str, format: &str) {
    let einstellungen = LogEinstellungen::aufloesen(level, format, |name| std::env::var(name).ok());
    let filter = einstellungen.filter();

    let ergebnis = match einstellungen.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if ergebnis.is_err() {
        tracing::debug!("Logging war bereits initialisiert");
    }
}
