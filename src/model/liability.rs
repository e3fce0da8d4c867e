//! Liability table entries

use serde::{Deserialize, Serialize};

use crate::config::LiabilityWeights;

/// The five sub-scores behind a liability total, each in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LiabilityScores {
    pub contradiction: f32,
    pub behavioral: f32,
    pub evidence: f32,
    pub consistency: f32,
    pub causal: f32,
}

impl LiabilityScores {
    /// Weighted sum in 0..=1; consistency counts against the actor as `1 - consistency`
    pub fn weighted(&self, weights: &LiabilityWeights) -> f32 {
        self.contradiction.clamp(0.0, 1.0) * weights.contradiction
            + self.behavioral.clamp(0.0, 1.0) * weights.behavioral
            + self.evidence.clamp(0.0, 1.0) * weights.evidence
            + (1.0 - self.consistency.clamp(0.0, 1.0)) * weights.inconsistency
            + self.causal.clamp(0.0, 1.0) * weights.causal
    }
}

/// One row of the liability table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityEntry {
    pub actor: String,
    pub contradiction_score: f32,
    pub behavioral_score: f32,
    pub evidence_score: f32,
    pub consistency_score: f32,
    pub causal_score: f32,
    /// Percentage in 0..=100
    pub total: f32,
    pub statement_count: usize,
    pub contradiction_count: usize,
    pub pattern_count: usize,
}

impl LiabilityEntry {
    pub fn new(actor: impl Into<String>, scores: LiabilityScores, weights: &LiabilityWeights) -> Self {
        let total = (scores.weighted(weights) * 100.0).clamp(0.0, 100.0);
        Self {
            actor: actor.into(),
            contradiction_score: scores.contradiction.clamp(0.0, 1.0),
            behavioral_score: scores.behavioral.clamp(0.0, 1.0),
            evidence_score: scores.evidence.clamp(0.0, 1.0),
            consistency_score: scores.consistency.clamp(0.0, 1.0),
            causal_score: scores.causal.clamp(0.0, 1.0),
            total,
            statement_count: 0,
            contradiction_count: 0,
            pattern_count: 0,
        }
    }

    pub fn with_counts(mut self, statements: usize, contradictions: usize, patterns: usize) -> Self {
        self.statement_count = statements;
        self.contradiction_count = contradictions;
        self.pattern_count = patterns;
        self
    }
}
