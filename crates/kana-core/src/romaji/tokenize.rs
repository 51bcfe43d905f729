use tracing::{debug, debug_span};

use super::tree::{mapping_tree, MappingNode};
use crate::options::KanaOptions;
use crate::unicode::lowercase_aligned;

/// A converted span of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Start position (char index, inclusive)
    pub start: usize,
    /// End position (char index, exclusive)
    pub end: usize,
    /// Kana for `start..end`, or `None` when the tail may still grow into a
    /// longer romaji sequence (IME mode only).
    pub kana: Option<String>,
}

impl Token {
    pub fn new(start: usize, end: usize, kana: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kana: Some(kana.into()),
        }
    }

    pub fn pending(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kana: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.kana.is_none()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `input` into tokens by longest match against `map`.
///
/// `input` is expected to be lowercase already. At each position the tree is
/// walked as far as the input allows and the deepest valued node wins. With
/// no valued node on the walk, one character passes through as itself.
///
/// When `optimize` is false (IME mode) and the walk runs off the end of the
/// input on a node that still has children, the remainder becomes a single
/// pending token and scanning stops.
pub fn apply_mapping(input: &str, map: &MappingNode, optimize: bool) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let _span = debug_span!("apply_mapping", char_count = chars.len(), optimize).entered();
    let mut tokens = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut node = map;
        let mut end = start;
        let mut longest: Option<(usize, &str)> = None;
        while let Some(next) = chars.get(end).and_then(|&c| node.child(c)) {
            node = next;
            end += 1;
            if let Some(kana) = node.value() {
                longest = Some((end, kana));
            }
        }

        if !optimize && end == chars.len() && node.has_children() {
            tokens.push(Token::pending(start, end));
            break;
        }

        match longest {
            Some((match_end, kana)) => {
                tokens.push(Token::new(start, match_end, kana));
                start = match_end;
            }
            None => {
                tokens.push(Token::new(start, start + 1, chars[start]));
                start += 1;
            }
        }
    }

    debug!(token_count = tokens.len());
    tokens
}

/// Lowercase `input`, resolve the tree for `options` (unless `map` is given)
/// and tokenize.
pub fn split_into_converted_kana(
    input: &str,
    options: &KanaOptions,
    map: Option<&MappingNode>,
) -> Vec<Token> {
    let lowered = lowercase_aligned(input);
    let optimize = !options.ime_mode.is_enabled();
    match map {
        Some(map) => apply_mapping(&lowered, map, optimize),
        None => apply_mapping(&lowered, &mapping_tree(options), optimize),
    }
}
