//! Utils Module
pub mod text;
pub mod truncate;

pub use text::{description_key, has_phrase, normalize_phrases, significant_words, tokenize, word_overlap, word_tokens};
pub use truncate::excerpt;
