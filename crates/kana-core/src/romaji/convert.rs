use tracing::debug_span;

use super::tokenize::split_into_converted_kana;
use super::tree::MappingNode;
use crate::options::{ImeMode, KanaOptions};
use crate::unicode::{hiragana_to_katakana, is_char_upper_case, lowercase_aligned};

/// Convert romaji in `input` to kana using the tree for `options`.
pub fn to_kana(input: &str, options: &KanaOptions) -> String {
    to_kana_with_map(input, options, None)
}

/// Convert romaji in `input` to kana.
///
/// Uses `map` when given, otherwise the cached tree for `options`.
/// A token whose source is entirely uppercase becomes katakana unless the
/// IME mode forces hiragana. In IME mode a pending tail is copied verbatim.
pub fn to_kana_with_map(input: &str, options: &KanaOptions, map: Option<&MappingNode>) -> String {
    let _span = debug_span!("to_kana", ime_mode = ?options.ime_mode).entered();
    let tokens = split_into_converted_kana(input, options, map);
    let original: Vec<char> = input.chars().collect();
    let lowered: Vec<char> = lowercase_aligned(input).chars().collect();
    let enforce_hiragana = options.ime_mode.enforces_hiragana();

    let mut out = String::with_capacity(input.len() * 3);
    for token in &tokens {
        let source = &original[token.start..token.end];
        let Some(kana) = token.kana.as_deref() else {
            out.extend(&original[token.start..]);
            break;
        };
        // Text the tree left alone keeps its original case.
        if lowered[token.start..token.end].iter().copied().eq(kana.chars()) {
            out.extend(source);
            continue;
        }
        let enforce_katakana = options.ime_mode.enforces_katakana()
            || source.iter().all(|&c| is_char_upper_case(c));
        if enforce_hiragana || !enforce_katakana {
            out.push_str(kana);
        } else {
            out.push_str(&hiragana_to_katakana(kana));
        }
    }
    out
}

/// Convert romaji in `input` to katakana.
///
/// In IME mode the katakana script is forced on the conversion itself, so a
/// pending tail stays as typed. Otherwise the converted text is shifted to
/// katakana afterwards.
pub fn to_katakana(input: &str, options: &KanaOptions) -> String {
    if options.ime_mode.is_enabled() {
        let forced = options.clone().with_ime_mode(ImeMode::Katakana);
        return to_kana(input, &forced);
    }
    hiragana_to_katakana(&to_kana(input, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(input: &str) -> String {
        to_kana(input, &KanaOptions::default())
    }

    #[test]
    fn test_basic_ka() {
        assert_eq!(convert("ka"), "か");
    }

    #[test]
    fn test_empty() {
        assert_eq!(convert(""), "");
    }

    #[test]
    fn test_uppercase_is_katakana() {
        assert_eq!(convert("ONAJI"), "オナジ");
        assert_eq!(convert("onaji"), "おなじ");
    }

    #[test]
    fn test_mixed_case_token_stays_hiragana() {
        assert_eq!(convert("Ka"), "か");
        assert_eq!(convert("KAka"), "カか");
    }

    #[test]
    fn test_ime_hiragana_overrides_uppercase() {
        let opts = KanaOptions::default().with_ime_mode(ImeMode::Hiragana);
        assert_eq!(to_kana("KANA", &opts), "かな");
    }

    #[test]
    fn test_ime_katakana_forces_script() {
        let opts = KanaOptions::default().with_ime_mode(ImeMode::Katakana);
        assert_eq!(to_kana("kana", &opts), "カナ");
    }

    #[test]
    fn test_pending_tail_copied_verbatim() {
        let opts = KanaOptions::default().with_ime_mode(ImeMode::On);
        assert_eq!(to_kana("kaK", &opts), "かK");
        assert_eq!(to_kana("KAnY", &opts), "カnY");
    }

    #[test]
    fn test_passthrough_keeps_case() {
        assert_eq!(convert("Ä @ 漢字"), "Ä @ 漢字");
    }

    #[test]
    fn test_explicit_map() {
        let mut map = MappingNode::new();
        map.insert("ka", "が");
        assert_eq!(to_kana_with_map("kaki", &KanaOptions::default(), Some(&map)), "がki");
    }

    #[test]
    fn test_to_katakana() {
        assert_eq!(to_katakana("toukyou", &KanaOptions::default()), "トウキョウ");
        let opts = KanaOptions::default().with_ime_mode(ImeMode::On);
        assert_eq!(to_katakana("kanak", &opts), "カナk");
    }
}
