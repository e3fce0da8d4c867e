//! Text Utilities
//!
//! Tokenization and word-level keys shared by the embedder, the similarity
//! heuristics and every detector that compares descriptions.

use std::collections::{BTreeSet, HashSet};

use lazy_static::lazy_static;

/// Tokens whose presence flips the polarity of a statement
pub const NEGATION_TOKENS: &[&str] = &[
    "never", "not", "no", "didn't", "don't", "doesn't", "wasn't", "weren't", "isn't", "aren't",
    "haven't", "hasn't", "hadn't", "won't", "wouldn't", "can't", "cannot", "couldn't", "false",
    "deny", "denied", "nothing", "nobody", "none", "neither", "nor",
];

const STOPWORDS: &[&str] = &[
    // articles, conjunctions, prepositions
    "the", "and", "but", "for", "nor", "yet", "with", "from", "into", "onto", "upon", "about",
    "over", "under", "after", "before", "between", "through", "during", "until", "than", "then",
    "also", "just", "very", "too", "only", "even", "ever", "still", "again", "there", "here",
    "this", "that", "these", "those", "such", "some", "any", "all", "each", "every", "both",
    "own", "same", "other", "another", "more", "most", "much", "many", "few", "one",
    // pronouns
    "you", "your", "yours", "him", "his", "her", "hers", "she", "they", "them", "their",
    "theirs", "our", "ours", "its", "who", "whom", "whose", "what", "which", "myself",
    "yourself", "himself", "herself", "themselves", "ourselves",
    // auxiliaries and common verbs
    "are", "was", "were", "been", "being", "have", "has", "had", "having", "does", "did",
    "doing", "done", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must", "get", "got", "let",
    // question words and fillers
    "when", "where", "why", "how", "because", "while", "what", "okay", "yeah", "well",
    // negations and contraction fragments
    "not", "never", "none", "nothing", "nobody", "neither", "cannot", "didn", "don", "doesn",
    "wasn", "weren", "isn", "aren", "haven", "hasn", "hadn", "won", "wouldn", "couldn",
    "shouldn", "can't", "ain",
];

lazy_static! {
    static ref STOPWORD_SET: HashSet<&'static str> = STOPWORDS.iter().copied().collect();
    static ref NEGATION_SET: HashSet<&'static str> = NEGATION_TOKENS.iter().copied().collect();
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Lowercase and split on every non-alphanumeric character.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase and split into words, keeping inner apostrophes so that
/// contractions such as "didn't" survive as one token.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\u{2019}', '\u{2018}', '`'], "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Content-bearing words in order of appearance: no stopwords, nothing of
/// two characters or fewer, no bare numbers.
pub fn significant_words(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() > 2)
        .filter(|t| !is_stopword(t))
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

pub fn significant_word_set(text: &str) -> BTreeSet<String> {
    significant_words(text).into_iter().collect()
}

/// Order-insensitive key for a description: the first `limit` significant
/// words after sorting and de-duplication, space-joined.
pub fn description_key(text: &str, limit: usize) -> String {
    significant_word_set(text)
        .into_iter()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Jaccard overlap of the significant-word sets. 0.0 when both are empty.
pub fn word_overlap(a: &str, b: &str) -> f32 {
    set_overlap(&significant_word_set(a), &significant_word_set(b))
}

pub fn set_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

/// True when any negation token appears as a whole word.
pub fn contains_negation(text: &str) -> bool {
    word_tokens(text).iter().any(|t| NEGATION_SET.contains(t.as_str()))
}

/// Space-padded, single-spaced word form of `text`, ready for whole-phrase
/// matching with `has_phrase`.
pub fn normalize_phrases(text: &str) -> String {
    format!(" {} ", word_tokens(text).join(" "))
}

/// Whole-word phrase match against the output of `normalize_phrases`.
pub fn has_phrase(normalized: &str, phrase: &str) -> bool {
    count_phrase(normalized, phrase) > 0
}

pub fn count_phrase(normalized: &str, phrase: &str) -> usize {
    let needle = normalize_phrases(phrase);
    if needle.trim().is_empty() {
        return 0;
    }
    normalized.matches(needle.as_str()).count()
}
