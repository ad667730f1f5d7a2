//! KeyDirectory – Alias -> oeffentlicher Schluessel
//!
//! Befuellt aus dem `directory` des Login-Erfolgs, danach gepflegt ueber
//! `user-joined` / `user-left`. Der eigene Alias wird nie aufgenommen.

use std::collections::BTreeMap;

use worstgen_core::Alias;
use worstgen_crypto::{parse_public_key, RsaPublicKey};
use worstgen_protocol::DirectoryEntry;

/// Veroeffentlichte Schluessel der anderen Teilnehmer
#[derive(Debug, Clone)]
pub struct KeyDirectory {
    eigener_alias: Alias,
    eintraege: BTreeMap<Alias, RsaPublicKey>,
}

impl KeyDirectory {
    pub fn new(eigener_alias: Alias) -> Self {
        Self {
            eigener_alias,
            eintraege: BTreeMap::new(),
        }
    }

    /// Baut das Verzeichnis aus dem Login-Payload; ungueltige Schluessel werden uebersprungen
    pub fn aus_eintraegen(eigener_alias: Alias, eintraege: Vec<DirectoryEntry>) -> Self {
        let mut directory = Self::new(eigener_alias);
        for eintrag in eintraege {
            directory.einfuegen(eintrag.alias, &eintrag.public_key);
        }
        directory
    }

    /// Nimmt einen Schluessel auf; `false` wenn er ungueltig ist oder der eigene Alias
    pub fn einfuegen(&mut self, alias: Alias, public_key_pem: &str) -> bool {
        if alias == self.eigener_alias {
            return false;
        }

        match parse_public_key(public_key_pem) {
            Ok(schluessel) => {
                tracing::debug!(alias = %alias, "Schluessel ins Verzeichnis aufgenommen");
                self.eintraege.insert(alias, schluessel);
                true
            }
            Err(e) => {
                tracing::warn!(alias = %alias, fehler = %e, "Ungueltiger oeffentlicher Schluessel, ignoriert");
                false
            }
        }
    }

    pub fn entfernen(&mut self, alias: &Alias) -> bool {
        self.eintraege.remove(alias).is_some()
    }

    pub fn enthaelt(&self, alias: &Alias) -> bool {
        self.eintraege.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.eintraege.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eintraege.is_empty()
    }

    /// Empfaenger in stabiler (alphabetischer) Reihenfolge
    pub fn iter(&self) -> impl Iterator<Item = (&Alias, &RsaPublicKey)> {
        self.eintraege.iter()
    }
}
