//! Romaji-to-kana conversion.
//!
//! The static table is loaded into a prefix tree (one per option set,
//! memoized), the input is split into tokens by longest match, and each
//! token is emitted as hiragana or katakana depending on the case of the
//! source text and the IME mode.

mod convert;
mod table;
mod tokenize;
mod tree;


pub use convert::{to_kana, to_kana_with_map, to_katakana};
pub use table::{parse_romaji_toml, RomajiTable, RomajiTableError, DEFAULT_TOML};
pub use tokenize::{apply_mapping, split_into_converted_kana, Token};
pub use tree::{base_tree, build_tree, mapping_tree, MappingNode, TreeCache, TrieLookupResult};
