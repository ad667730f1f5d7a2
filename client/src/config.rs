//! Client-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Client ohne Konfigurationsdatei
//! lauffaehig ist. Kommandozeilen-Argumente ueberschreiben die Datei.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Standard-Relay
pub const DEFAULT_SERVER: &str = "https://worst-generation.onrender.com";

/// Vollstaendige Client-Konfiguration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Relay-Adresse und Zeitlimits
    pub verbindung: VerbindungsEinstellungen,
    /// Alias und Registrierungsschluessel
    pub identitaet: IdentitaetsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Verbindungs-Einstellungen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbindungsEinstellungen {
    /// `https://` (Socket.IO), `wss://`, `tcp://host:port` oder `host:port`
    pub server: String,
    /// Zeitlimit fuer Login/Registrierung in Sekunden
    pub auth_timeout_secs: u64,
}

impl Default for VerbindungsEinstellungen {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.into(),
            auth_timeout_secs: 30,
        }
    }
}

/// Identitaets-Einstellungen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitaetsEinstellungen {
    /// Alias (leer = Abfrage nach dem Verbinden)
    pub alias: Option<String>,
    /// Registrierungsschluessel fuer neue Aliase
    pub registrierungsschluessel: Option<String>,
}

/// Logging-Einstellungen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level bzw. `EnvFilter`-Ausdruck
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl ClientConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt).map_err(|e| {
                    anyhow::anyhow!("ungueltiges TOML in '{}': {e}", pfad.display())
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    pfad = %pfad.display(),
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Datei '{}' nicht lesbar: {e}",
                pfad.display()
            )),
        }
    }

    /// Uebernimmt gesetzte Kommandozeilen-Argumente
    pub fn mit_cli(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.verbindung.server = server.clone();
        }
        if let Some(alias) = &cli.alias {
            self.identitaet.alias = Some(alias.clone());
        }
        if let Some(key) = &cli.key {
            self.identitaet.registrierungsschluessel = Some(key.clone());
        }
        self
    }

    /// Zeitlimit fuer den Handshake (mindestens eine Sekunde)
    pub fn auth_zeitlimit(&self) -> Duration {
        Duration::from_secs(self.verbindung.auth_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use worstgen_protocol::{TextFormat, Transport};

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.verbindung.server, DEFAULT_SERVER);
        assert_eq!(cfg.auth_zeitlimit(), Duration::from_secs(30));
        assert_eq!(cfg.logging.level, "warn");
        assert!(cfg.identitaet.alias.is_none());
    }

    #[test]
    fn standard_server_spricht_socketio() {
        match Transport::bestimmen(DEFAULT_SERVER).unwrap() {
            Transport::WebSocket { url, format } => {
                assert_eq!(url.scheme(), "wss");
                assert_eq!(format, TextFormat::SocketIo);
            }
            anderes => panic!("WebSocket erwartet, bekommen: {anderes:?}"),
        }
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [verbindung]
            server = "tcp://127.0.0.1:7878"

            [identitaet]
            alias = "acid_burn"
        "#;
        let cfg: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.verbindung.server, "tcp://127.0.0.1:7878");
        assert_eq!(cfg.identitaet.alias.as_deref(), Some("acid_burn"));
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.verbindung.auth_timeout_secs, 30);
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn fehlende_datei_ergibt_standardwerte() {
        let cfg = ClientConfig::laden(Path::new("/gibt/es/nicht/worstgen.toml")).unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn datei_laden_und_fehlerhafte_datei() {
        let mut datei = tempfile::NamedTempFile::new().unwrap();
        writeln!(datei, "[verbindung]\nauth_timeout_secs = 5").unwrap();
        let cfg = ClientConfig::laden(datei.path()).unwrap();
        assert_eq!(cfg.auth_zeitlimit(), Duration::from_secs(5));

        let mut kaputt = tempfile::NamedTempFile::new().unwrap();
        writeln!(kaputt, "[verbindung\nserver = ").unwrap();
        let fehler = ClientConfig::laden(kaputt.path()).unwrap_err();
        assert!(fehler.to_string().contains("ungueltiges TOML"));
    }

    #[test]
    fn cli_ueberschreibt_datei() {
        let datei = ClientConfig {
            identitaet: IdentitaetsEinstellungen {
                alias: Some("aus_datei".into()),
                registrierungsschluessel: Some("datei-key".into()),
            },
            ..Default::default()
        };
        let cli = Cli::try_parse_from(["worstgen", "-a", "von_cli", "-s", "relay:1"]).unwrap();
        let cfg = datei.mit_cli(&cli);

        assert_eq!(cfg.identitaet.alias.as_deref(), Some("von_cli"));
        assert_eq!(cfg.verbindung.server, "relay:1");
        // Nicht auf der Kommandozeile gesetzt -> Wert aus der Datei bleibt
        assert_eq!(cfg.identitaet.registrierungsschluessel.as_deref(), Some("datei-key"));
    }

    #[test]
    fn zeitlimit_null_wird_auf_eine_sekunde_angehoben() {
        let mut cfg = ClientConfig::default();
        cfg.verbindung.auth_timeout_secs = 0;
        assert_eq!(cfg.auth_zeitlimit(), Duration::from_secs(1));
    }
}
