use std::fmt;

use fabula_core::{LocaleStore, Result};

const EN_JSON: &str = include_str!("../assets/locales/en.json");
const NB_NO_JSON: &str = include_str!("../assets/locales/nb_no.json");

/// Locales bundled with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocaleKey {
    En,
    NbNo,
}

impl LocaleKey {
    pub const ALL: &'static [LocaleKey] = &[LocaleKey::En, LocaleKey::NbNo];

    /// The locale every other locale falls back to.
    pub const FALLBACK: LocaleKey = LocaleKey::En;

    /// Accepts `en`, `en_US`, `nb_no`, `nb-NO` and similar spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "en" | "en_us" => Some(Self::En),
            "nb" | "nb_no" | "no" => Some(Self::NbNo),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::NbNo => "nb_no",
        }
    }

    /// Decode the embedded locale table.
    pub fn load(self) -> Result<LocaleStore> {
        let source = match self {
            Self::En => EN_JSON,
            Self::NbNo => NB_NO_JSON,
        };
        LocaleStore::from_json_str(self.as_str(), source)
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
