//! Worstgen Client – Einstiegspunkt
//!
//! Liest Kommandozeile und Konfiguration, initialisiert das Logging und
//! fuehrt eine Sitzung aus. Nur hier wird aus einem Ergebnis ein Exit-Code.

use std::process::ExitCode;

use clap::Parser;
use worstgen_chat::Flow;
use worstgen_client::{cli::Cli, fehlermeldung, konfiguration_laden, Client};
use worstgen_core::Result;
use worstgen_observability::logging_initialisieren;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match ausfuehren(cli).await {
        Ok(flow) => {
            tracing::debug!(?flow, "Client beendet");
            ExitCode::SUCCESS
        }
        Err(fehler) => {
            tracing::error!(fehler = %fehler, "Client mit Fehler beendet");
            for zeile in fehlermeldung(&fehler) {
                eprintln!("{zeile}");
            }
            ExitCode::from(fehler.exit_code())
        }
    }
}

async fn ausfuehren(cli: Cli) -> Result<Flow> {
    // Standardwerte falls die Datei fehlt
    let config = konfiguration_laden(&cli)?;

    logging_initialisieren(&config.logging.level, &config.logging.format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        server = %config.verbindung.server,
        "Worstgen Client wird gestartet"
    );

    Client::neu(config).starten().await
}
