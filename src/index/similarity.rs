//! Similarity
//!
//! Cosine similarity over embeddings plus the lexical heuristics that turn
//! "related" into "contradictory".

use std::collections::HashSet;

use crate::config::SimilarityThresholds;
use crate::model::Statement;
use crate::utils::text::{contains_negation, word_overlap, word_tokens};

/// Word pairs that stand for opposite facts
const OPPOSING_TERMS: &[(&str, &str)] = &[
    ("paid", "unpaid"),
    ("agreed", "refused"),
    ("accepted", "rejected"),
    ("approved", "denied"),
    ("always", "never"),
    ("true", "false"),
    ("yes", "no"),
    ("guilty", "innocent"),
    ("present", "absent"),
    ("signed", "unsigned"),
    ("delivered", "undelivered"),
    ("legal", "illegal"),
    ("valid", "invalid"),
    ("complete", "incomplete"),
    ("loan", "gift"),
    ("before", "after"),
    ("received", "returned"),
];

/// Minimum significant-word overlap before two texts are compared for opposition
const OVERLAP_GATE: f32 = 0.3;

/// Dot product over norms; 0.0 when either vector has zero magnitude
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// True when exactly one of the two texts carries a negation token
pub fn lexical_opposition(a: &str, b: &str) -> bool {
    contains_negation(a) != contains_negation(b)
}

/// True when the texts take opposite sides of a known antonym pair
pub fn opposing_terms(a: &str, b: &str) -> bool {
    let a_words: HashSet<String> = word_tokens(a).into_iter().collect();
    let b_words: HashSet<String> = word_tokens(b).into_iter().collect();

    OPPOSING_TERMS.iter().any(|(x, y)| {
        let side_a = (a_words.contains(*x), a_words.contains(*y));
        let side_b = (b_words.contains(*x), b_words.contains(*y));
        (side_a == (true, false) && side_b == (false, true)) || (side_a == (false, true) && side_b == (true, false))
    })
}

/// Word-overlap gated opposition check used on claims, where embeddings
/// are not in play
pub fn statements_contradict(a: &str, b: &str) -> bool {
    word_overlap(a, b) > OVERLAP_GATE && (lexical_opposition(a, b) || opposing_terms(a, b))
}

/// Threshold-aware similarity judgements
#[derive(Debug, Clone, Copy)]
pub struct Similarity {
    thresholds: SimilarityThresholds,
}

impl Similarity {
    pub fn new(thresholds: SimilarityThresholds) -> Self {
        Self { thresholds }
    }

    /// Cosine of the two statements' embeddings, 0.0 if either is missing
    pub fn between(&self, a: &Statement, b: &Statement) -> f32 {
        match (&a.embedding, &b.embedding) {
            (Some(x), Some(y)) => cosine(x, y),
            _ => 0.0,
        }
    }

    pub fn is_related(&self, similarity: f32) -> bool {
        similarity >= self.thresholds.related
    }

    /// Related and of opposite polarity
    pub fn is_direct_contradiction(&self, similarity: f32, a: &str, b: &str) -> bool {
        self.is_related(similarity) && lexical_opposition(a, b)
    }

    /// Related but drifting: inside `[related, drift_upper)`
    pub fn is_implicit_contradiction(&self, similarity: f32) -> bool {
        similarity >= self.thresholds.related && similarity < self.thresholds.drift_upper
    }

    /// 0.5 at the related threshold rising to 1.0 at the strong threshold
    pub fn direct_confidence(&self, similarity: f32) -> f32 {
        let t = &self.thresholds;
        let span = (t.strong - t.related).max(f32::EPSILON);
        (0.5 + 0.5 * ((similarity - t.related) / span)).clamp(0.5, 1.0)
    }

    /// 0.7 at the bottom of the drift band falling to 0.3 at its top
    pub fn drift_confidence(&self, similarity: f32) -> f32 {
        let t = &self.thresholds;
        let span = (t.drift_upper - t.related).max(f32::EPSILON);
        let closeness = ((t.drift_upper - similarity) / span).clamp(0.0, 1.0);
        0.3 + 0.4 * closeness
    }
}

impl Default for Similarity {
    fn default() -> Self {
        Self::new(SimilarityThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Embedder, HashedEmbedder};

    #[test]
    fn test_cosine_zero_magnitude() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        assert!((cosine(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_lexical_opposition_is_exclusive() {
        assert!(lexical_opposition("I never signed it", "I signed it"));
        assert!(!lexical_opposition("I never signed it", "I did not sign it"));
        assert!(!lexical_opposition("I signed it", "I sent it"));
    }

    #[test]
    fn test_opposing_terms() {
        assert!(opposing_terms("the invoice was paid", "the invoice is unpaid"));
        assert!(!opposing_terms("the invoice was paid", "the invoice was paid"));
    }

    #[test]
    fn test_statements_contradict_needs_overlap() {
        assert!(statements_contradict("I paid the rent for March", "I never paid the rent for March"));
        assert!(!statements_contradict("I paid the rent", "I never visited Paris"));
    }

    #[test]
    fn test_negated_statement_is_direct_contradiction() {
        let embedder = HashedEmbedder::default();
        let a = "I never signed the contract";
        let b = "I signed the contract";
        let sim = cosine(&embedder.embed(a), &embedder.embed(b));
        let judge = Similarity::default();
        assert!(sim >= 0.70);
        assert!(judge.is_direct_contradiction(sim, a, b));
        assert!(!judge.is_implicit_contradiction(sim));
    }

    #[test]
    fn test_band_boundaries() {
        let judge = Similarity::default();
        assert!(judge.is_implicit_contradiction(0.25));
        assert!(judge.is_implicit_contradiction(0.44));
        assert!(!judge.is_implicit_contradiction(0.45));
        assert!(!judge.is_implicit_contradiction(0.2499));
        assert!(judge.is_related(0.25));
        assert!(!judge.is_related(0.2499));
    }

    #[test]
    fn test_confidence_curves() {
        let judge = Similarity::default();
        assert!((judge.direct_confidence(0.25) - 0.5).abs() < 1e-6);
        assert!((judge.direct_confidence(0.95) - 1.0).abs() < 1e-6);
        assert!(judge.drift_confidence(0.26) > judge.drift_confidence(0.44));
    }
}
