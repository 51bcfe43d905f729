use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_TOML: &str = include_str!("default_romaji.toml");

static TABLE: OnceLock<RomajiTable> = OnceLock::new();

/// Consonants whose doubling produces a sokuon (っ) prefix.
///
/// `n` is excluded because `nn` is ん; `l` and `x` only prefix small kana.
const SOKUON_CONSONANTS: &str = "bcdfghjkmpqrstvwyz";

#[derive(Debug, thiserror::Error)]
pub enum RomajiTableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[mappings] table is empty")]
    Empty,
    #[error("non-ASCII key: {0}")]
    NonAsciiKey(String),
    #[error("empty value for key: {0}")]
    EmptyValue(String),
    #[error("romaji table already initialized")]
    AlreadyInitialized,
}

/// The static romaji data every mapping tree is derived from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RomajiTable {
    pub mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub punctuation: BTreeMap<String, String>,
    #[serde(default)]
    pub obsolete: BTreeMap<String, String>,
    #[serde(default)]
    pub ime: BTreeMap<String, String>,
}

impl RomajiTable {
    /// Replace the embedded table.
    ///
    /// Fails with `AlreadyInitialized` once the global table exists, whether
    /// it came from an earlier `init_custom` or from a `global()` call.
    pub fn init_custom(toml_content: &str) -> Result<(), RomajiTableError> {
        let table = parse_romaji_toml(toml_content)?;
        TABLE
            .set(table)
            .map_err(|_| RomajiTableError::AlreadyInitialized)
    }

    /// Get or initialize the global table, falling back to the embedded one.
    pub fn global() -> &'static RomajiTable {
        TABLE.get_or_init(|| parse_romaji_toml(DEFAULT_TOML).expect("romaji TOML must be valid"))
    }

    /// Doubled-consonant entries derived from `mappings`.
    ///
    /// `kka` → `っか`, `ttsu` → `っつ`, and `tch…` → `っ` + the `ch…` kana.
    /// Keys already present in `mappings` are never shadowed.
    pub fn sokuon_entries(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (romaji, kana) in &self.mappings {
            if !kana.chars().next().is_some_and(crate::unicode::is_hiragana) {
                continue;
            }
            let Some(first) = romaji.chars().next() else {
                continue;
            };
            if SOKUON_CONSONANTS.contains(first) {
                out.insert(format!("{first}{romaji}"), format!("っ{kana}"));
            }
            if romaji.starts_with("ch") {
                out.insert(format!("t{romaji}"), format!("っ{kana}"));
            }
        }
        out.retain(|romaji, _| !self.mappings.contains_key(romaji));
        out
    }
}

/// Parse TOML text into a `RomajiTable`.
///
/// Syllable keys must be ASCII; punctuation keys may be any character
/// (curly quotes map to Japanese brackets).
pub fn parse_romaji_toml(toml_str: &str) -> Result<RomajiTable, RomajiTableError> {
    let table: RomajiTable =
        toml::from_str(toml_str).map_err(|e| RomajiTableError::Parse(e.to_string()))?;

    if table.mappings.is_empty() {
        return Err(RomajiTableError::Empty);
    }

    for key in table.mappings.keys().chain(table.obsolete.keys()) {
        if !key.is_ascii() {
            return Err(RomajiTableError::NonAsciiKey(key.clone()));
        }
    }

    let sections = [
        &table.mappings,
        &table.punctuation,
        &table.obsolete,
        &table.ime,
    ];
    for (key, value) in sections.into_iter().flatten() {
        if value.is_empty() {
            return Err(RomajiTableError::EmptyValue(key.clone()));
        }
    }

    Ok(table)
}
