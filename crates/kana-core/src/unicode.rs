//! Character-level helpers for romaji and kana text.

/// Check the full Hiragana block (U+3040..U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_char_upper_case(c: char) -> bool {
    c.is_uppercase()
}

/// Convert a hiragana string to katakana.
///
/// Only letters (ぁ..ゖ) and iteration marks (ゝゞ) have a katakana twin at
/// +0x60. Voicing marks, ー, ASCII and katakana pass through unchanged.
pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{3041}'..='\u{3096}').contains(&c) || ('\u{309D}'..='\u{309E}').contains(&c) {
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Lowercase `s` one character at a time.
///
/// Characters whose lowercase form is not a single character (e.g. `İ`) are
/// kept as is, so char index `i` of the result always corresponds to char
/// index `i` of the input.
pub fn lowercase_aligned(s: &str) -> String {
    s.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiragana_to_katakana() {
        assert_eq!(hiragana_to_katakana("きょうは"), "キョウハ");
        assert_eq!(hiragana_to_katakana("らーめん"), "ラーメン");
        assert_eq!(hiragana_to_katakana("ゐゑ"), "ヰヱ");
        assert_eq!(hiragana_to_katakana("ゕゖゝゞ"), "ヵヶヽヾ");
        assert_eq!(hiragana_to_katakana(""), "");
        assert_eq!(hiragana_to_katakana("abc！"), "abc！");
        assert_eq!(hiragana_to_katakana("カタカナ"), "カタカナ");
    }

    #[test]
    fn voicing_marks_unchanged() {
        assert_eq!(hiragana_to_katakana("\u{309B}\u{309C}"), "\u{309B}\u{309C}");
    }

    #[test]
    fn test_char_classification() {
        assert!(is_hiragana('あ'));
        assert!(!is_hiragana('ア'));
        assert!(is_katakana('ア'));
        assert!(is_katakana('ー'));
        assert!(!is_katakana('あ'));
        assert!(is_char_upper_case('A'));
        assert!(is_char_upper_case('Ä'));
        assert!(!is_char_upper_case('a'));
        assert!(!is_char_upper_case('-'));
        assert!(!is_char_upper_case('あ'));
    }

    #[test]
    fn test_lowercase_aligned() {
        assert_eq!(lowercase_aligned("OnAJi"), "onaji");
        assert_eq!(lowercase_aligned("ÄÖ"), "äö");
        assert_eq!(lowercase_aligned("かナ!"), "かナ!");
        let dotted = "İA";
        assert_eq!(lowercase_aligned(dotted), "İa");
        assert_eq!(
            lowercase_aligned(dotted).chars().count(),
            dotted.chars().count()
        );
    }
}
