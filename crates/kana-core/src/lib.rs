pub mod options;
pub mod romaji;
pub mod trace_init;
pub mod unicode;

pub use options::{parse_options_toml, ImeMode, KanaOptions, OptionsError};
pub use romaji::{to_kana, to_kana_with_map, to_katakana, MappingNode, Token};
