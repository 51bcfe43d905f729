//! Conversion options.
//!
//! - `KanaOptions::default()` gives plain conversion (no IME, modern kana only)
//! - `parse_options_toml(toml_content)` loads options from a TOML document
//! - `ime_mode` accepts `true`/`false` or `"hiragana"`/`"katakana"`

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// IME composition mode.
///
/// Any mode other than `Off` leaves an ambiguous trailing romaji sequence
/// unconverted. `Hiragana`/`Katakana` also force the output script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawImeMode")]
pub enum ImeMode {
    #[default]
    Off,
    On,
    Hiragana,
    Katakana,
}

impl ImeMode {
    pub fn is_enabled(self) -> bool {
        self != ImeMode::Off
    }

    pub fn enforces_hiragana(self) -> bool {
        self == ImeMode::Hiragana
    }

    pub fn enforces_katakana(self) -> bool {
        self == ImeMode::Katakana
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImeMode {
    Flag(bool),
    Named(String),
}

impl TryFrom<RawImeMode> for ImeMode {
    type Error = String;

    fn try_from(raw: RawImeMode) -> Result<Self, Self::Error> {
        match raw {
            RawImeMode::Flag(false) => Ok(ImeMode::Off),
            RawImeMode::Flag(true) => Ok(ImeMode::On),
            RawImeMode::Named(name) => match name.as_str() {
                "hiragana" => Ok(ImeMode::Hiragana),
                "katakana" => Ok(ImeMode::Katakana),
                other => Err(format!(
                    "unknown ime_mode {other:?} (expected true, false, \"hiragana\" or \"katakana\")"
                )),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KanaOptions {
    #[serde(alias = "IMEMode")]
    pub ime_mode: ImeMode,
    #[serde(alias = "useObsoleteKana")]
    pub use_obsolete_kana: bool,
    /// Romaji → kana overrides, applied on top of the base table.
    #[serde(alias = "customKanaMapping")]
    pub custom_kana_mapping: BTreeMap<String, String>,
}

impl KanaOptions {
    pub fn with_ime_mode(mut self, ime_mode: ImeMode) -> Self {
        self.ime_mode = ime_mode;
        self
    }

    pub fn with_obsolete_kana(mut self, use_obsolete_kana: bool) -> Self {
        self.use_obsolete_kana = use_obsolete_kana;
        self
    }

    pub fn with_custom_mapping<K, V>(mut self, mapping: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.custom_kana_mapping
            .extend(mapping.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// `None` when there is nothing to merge, so callers can skip the custom layer.
    pub fn custom_mapping(&self) -> Option<&BTreeMap<String, String>> {
        (!self.custom_kana_mapping.is_empty()).then_some(&self.custom_kana_mapping)
    }
}

pub fn parse_options_toml(toml_str: &str) -> Result<KanaOptions, OptionsError> {
    let options: KanaOptions =
        toml::from_str(toml_str).map_err(|e| OptionsError::Parse(e.to_string()))?;
    validate(&options)?;
    Ok(options)
}

fn validate(options: &KanaOptions) -> Result<(), OptionsError> {
    for (key, value) in &options.custom_kana_mapping {
        if key.is_empty() {
            return Err(OptionsError::InvalidValue {
                field: "custom_kana_mapping".to_string(),
                reason: "key must not be empty".to_string(),
            });
        }
        if value.is_empty() {
            return Err(OptionsError::InvalidValue {
                field: format!("custom_kana_mapping.{key}"),
                reason: "value must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = KanaOptions::default();
        assert_eq!(opts.ime_mode, ImeMode::Off);
        assert!(!opts.use_obsolete_kana);
        assert!(opts.custom_mapping().is_none());
    }

    #[test]
    fn parse_empty_document_gives_defaults() {
        assert_eq!(parse_options_toml("").unwrap(), KanaOptions::default());
    }

    #[test]
    fn parse_full_document() {
        let toml = r#"
ime_mode = "katakana"
use_obsolete_kana = true

[custom_kana_mapping]
na = "に"
ka = "bana"
"#;
        let opts = parse_options_toml(toml).unwrap();
        assert_eq!(opts.ime_mode, ImeMode::Katakana);
        assert!(opts.use_obsolete_kana);
        assert_eq!(opts.custom_kana_mapping["na"], "に");
        assert_eq!(opts.custom_kana_mapping["ka"], "bana");
    }

    #[test]
    fn parse_ime_mode_variants() {
        let cases = [
            ("ime_mode = false", ImeMode::Off),
            ("ime_mode = true", ImeMode::On),
            ("ime_mode = \"hiragana\"", ImeMode::Hiragana),
            ("ime_mode = \"katakana\"", ImeMode::Katakana),
        ];
        for (toml, expected) in cases {
            assert_eq!(parse_options_toml(toml).unwrap().ime_mode, expected, "{toml}");
        }
    }

    #[test]
    fn parse_camel_case_aliases() {
        let toml = r#"
IMEMode = true
useObsoleteKana = true

[customKanaMapping]
na = "に"
"#;
        let opts = parse_options_toml(toml).unwrap();
        assert_eq!(opts.ime_mode, ImeMode::On);
        assert!(opts.use_obsolete_kana);
        assert_eq!(opts.custom_kana_mapping.len(), 1);
    }

    #[test]
    fn error_unknown_ime_mode() {
        let err = parse_options_toml("ime_mode = \"romaji\"").unwrap_err();
        assert!(matches!(err, OptionsError::Parse(_)));
    }

    #[test]
    fn error_empty_custom_key() {
        let toml = "[custom_kana_mapping]\n\"\" = \"に\"\n";
        let err = parse_options_toml(toml).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidValue { .. }));
    }

    #[test]
    fn error_empty_custom_value() {
        let toml = "[custom_kana_mapping]\nna = \"\"\n";
        let err = parse_options_toml(toml).unwrap_err();
        match err {
            OptionsError::InvalidValue { field, .. } => {
                assert_eq!(field, "custom_kana_mapping.na")
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn builder_setters() {
        let opts = KanaOptions::default()
            .with_ime_mode(ImeMode::Hiragana)
            .with_obsolete_kana(true)
            .with_custom_mapping([("na", "に")]);
        assert!(opts.ime_mode.is_enabled());
        assert!(opts.ime_mode.enforces_hiragana());
        assert!(!opts.ime_mode.enforces_katakana());
        assert_eq!(opts.custom_mapping().unwrap()["na"], "に");
    }
}
