//! Liability Scorer
//!
//! Combines five per-actor sub-scores into a 0..=100 total:
//!
//! | sub-score     | measure                                                   |
//! |---------------|-----------------------------------------------------------|
//! | contradiction | contradictions involving the actor per statement          |
//! | behavioral    | mean confidence of the actor's patterns                   |
//! | evidence      | distinct source types over all known source types         |
//! | consistency   | share of the actor's statement pairs that never conflict  |
//! | causal        | share of the actor's events that initiate something       |

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::config::LiabilityWeights;
use crate::index::StatementIndex;
use crate::model::{
    BehavioralPattern, Contradiction, LiabilityEntry, LiabilityScores, SourceType, TimelineEvent,
};
use crate::utils::text::{has_phrase, normalize_phrases};

const INITIATION_WORDS: &[&str] = &[
    "request", "requested", "requesting", "demand", "demanded", "demanding", "sent", "initiated",
    "started",
];

pub struct LiabilityScorer {
    weights: LiabilityWeights,
}

impl LiabilityScorer {
    pub fn new(weights: LiabilityWeights) -> Self {
        Self { weights }
    }

    /// One entry per indexed actor, keyed by actor key
    pub fn score(
        &self,
        index: &StatementIndex,
        contradictions: &[Contradiction],
        patterns: &[BehavioralPattern],
        timeline: &[TimelineEvent],
    ) -> BTreeMap<String, LiabilityEntry> {
        let table: BTreeMap<String, LiabilityEntry> = index
            .actors()
            .into_iter()
            .map(|actor| {
                let entry = self.score_actor(&actor, index, contradictions, patterns, timeline);
                (actor, entry)
            })
            .collect();

        info!("Scored liability for {} actors", table.len());
        table
    }

    fn score_actor(
        &self,
        actor: &str,
        index: &StatementIndex,
        contradictions: &[Contradiction],
        patterns: &[BehavioralPattern],
        timeline: &[TimelineEvent],
    ) -> LiabilityEntry {
        let statements = index.by_actor(actor);
        let statement_count = statements.len();

        let involved: Vec<&Contradiction> = contradictions.iter().filter(|c| c.involves(actor)).collect();
        let contradiction = if statement_count == 0 {
            0.0
        } else {
            involved.len() as f32 / statement_count as f32
        };

        let actor_patterns: Vec<&BehavioralPattern> = patterns.iter().filter(|p| p.actor == actor).collect();
        let behavioral = if actor_patterns.is_empty() {
            0.0
        } else {
            actor_patterns.iter().map(|p| p.confidence).sum::<f32>() / actor_patterns.len() as f32
        };

        let sources: BTreeSet<SourceType> = statements.iter().map(|s| s.source_type).collect();
        let evidence = sources.len() as f32 / SourceType::known_count() as f32;

        let consistency = Self::consistency(actor, statement_count, &involved);
        let causal = Self::causal(actor, timeline);

        let scores = LiabilityScores { contradiction, behavioral, evidence, consistency, causal };
        debug!("Liability sub-scores for {}: {:?}", actor, scores);

        LiabilityEntry::new(actor, scores, &self.weights).with_counts(statement_count, involved.len(), actor_patterns.len())
    }

    /// 1 minus the share of the actor's own statement pairs that appear in
    /// any contradiction
    fn consistency(actor: &str, statement_count: usize, involved: &[&Contradiction]) -> f32 {
        if statement_count < 2 {
            return 1.0;
        }
        let conflicting: BTreeSet<(&str, &str)> = involved
            .iter()
            .filter(|c| c.statement_a.actor == actor && c.statement_b.actor == actor)
            .filter(|c| c.statement_a.id != c.statement_b.id)
            .map(|c| c.statement_pair())
            .collect();

        let total_pairs = statement_count * (statement_count - 1) / 2;
        (1.0 - conflicting.len() as f32 / total_pairs as f32).clamp(0.0, 1.0)
    }

    fn causal(actor: &str, timeline: &[TimelineEvent]) -> f32 {
        let events: Vec<&TimelineEvent> = timeline.iter().filter(|e| e.involves(actor)).collect();
        if events.is_empty() {
            return 0.0;
        }
        let initiating = events
            .iter()
            .filter(|e| {
                let normalized = normalize_phrases(&e.description);
                INITIATION_WORDS.iter().any(|w| has_phrase(&normalized, w))
            })
            .count();
        initiating as f32 / events.len() as f32
    }
}

impl Default for LiabilityScorer {
    fn default() -> Self {
        Self::new(LiabilityWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TimelineBuilder;
    use crate::model::{ContradictionType, RawStatement, Statement};

    fn setup() -> (StatementIndex, Vec<Contradiction>) {
        let mut index = StatementIndex::new();
        let rows = [
            ("ann", "I sent the request for payment", "2023-01-01", SourceType::Email),
            ("ann", "I never sent anything", "2023-01-02", SourceType::Chat),
            ("ann", "The weather was nice", "2023-01-03", SourceType::Chat),
            ("ben", "Nothing to add", "2023-01-04", SourceType::Transcript),
        ];
        for (actor, text, ts, source) in rows {
            let raw = RawStatement::new(actor, text, "doc").with_timestamp(ts).with_source(source);
            index.add(Statement::from_raw(raw, actor, 0)).unwrap();
        }
        let ann = index.by_actor("ann");
        let contradiction = Contradiction::new(
            ContradictionType::Direct,
            7,
            0.9,
            ann[0].to_ref(),
            ann[1].to_ref(),
            "sent vs never sent",
        )
        .unwrap();
        (index, vec![contradiction.clone(), contradiction])
    }

    #[test]
    fn test_sub_scores() {
        let (index, contradictions) = setup();
        let timeline = TimelineBuilder::new().build(&index);
        let table = LiabilityScorer::default().score(&index, &contradictions, &[], &timeline);

        let ann = &table["ann"];
        assert_eq!(ann.statement_count, 3);
        assert_eq!(ann.contradiction_count, 2);
        assert!((ann.contradiction_score - 2.0 / 3.0).abs() < 1e-6);
        assert!((ann.evidence_score - 2.0 / 8.0).abs() < 1e-6);
        // duplicate contradictions on one pair count once
        assert!((ann.consistency_score - 2.0 / 3.0).abs() < 1e-6);
        assert!((ann.causal_score - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(ann.behavioral_score, 0.0);

        let ben = &table["ben"];
        assert_eq!(ben.consistency_score, 1.0);
        assert_eq!(ben.contradiction_score, 0.0);
    }

    #[test]
    fn test_totals_are_bounded_and_weight_sensitive() {
        let (index, contradictions) = setup();
        let timeline = TimelineBuilder::new().build(&index);
        let standard = LiabilityScorer::new(LiabilityWeights::standard()).score(&index, &contradictions, &[], &timeline);
        let weighted = LiabilityScorer::new(LiabilityWeights::behavior_weighted()).score(&index, &contradictions, &[], &timeline);

        for entry in standard.values().chain(weighted.values()) {
            assert!((0.0..=100.0).contains(&entry.total));
        }
        assert_ne!(standard["ann"].total, weighted["ann"].total);
    }
}
