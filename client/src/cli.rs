//! Kommandozeile

use std::path::PathBuf;

use clap::Parser;

/// Worst Generation - encrypted terminal chat
///
/// Connects to a chat relay, logs in (or registers a new alias with a
/// registration key) and opens an end-to-end encrypted chat.
#[derive(Debug, Clone, Parser)]
#[command(name = "worstgen", version)]
pub struct Cli {
    /// Relay address (https:// for Socket.IO, ws(s)://, tcp://host:port or host:port)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Your hacker alias (prompted after connecting if omitted)
    #[arg(short, long)]
    pub alias: Option<String>,

    /// Server registration key (only needed for first-time setup)
    #[arg(short, long, env = "WORSTGEN_REGISTRATION_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long, env = "WORSTGEN_CONFIG", default_value = "worstgen.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_ist_gueltig() {
        Cli::command().debug_assert();
    }

    #[test]
    fn kurze_flags() {
        let cli = Cli::try_parse_from([
            "worstgen", "-s", "tcp://relay:7878", "-a", "zero_cool", "-k", "geheim", "-c", "x.toml",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("tcp://relay:7878"));
        assert_eq!(cli.alias.as_deref(), Some("zero_cool"));
        assert_eq!(cli.key.as_deref(), Some("geheim"));
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn lange_flags() {
        let cli = Cli::try_parse_from(["worstgen", "--server", "relay:1", "--alias", "acid_burn"]).unwrap();
        assert_eq!(cli.server.as_deref(), Some("relay:1"));
        assert_eq!(cli.alias.as_deref(), Some("acid_burn"));
    }
}
