//! Semantic drift: one actor, two statements related enough to be about the
//! same thing but not close enough to agree.

use super::{ContradictionDetector, DetectionContext};
use crate::error::Result;
use crate::model::{Contradiction, ContradictionType};
use crate::utils::excerpt;

const BASE_SEVERITY: i64 = 4;
const CONFIDENT_DRIFT: f32 = 0.6;

pub struct SemanticDetector;

impl ContradictionDetector for SemanticDetector {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        let pairs = ctx.same_actor_pairs();

        ctx.evaluate(&pairs, |(a, b)| {
            let similarity = ctx.similarity.between(a, b);
            // opposite-polarity pairs belong to the direct pass
            if ctx.similarity.is_direct_contradiction(similarity, &a.text, &b.text)
                || !ctx.similarity.is_implicit_contradiction(similarity)
            {
                return Ok(None);
            }

            let confidence = ctx.similarity.drift_confidence(similarity);
            let severity = if confidence >= CONFIDENT_DRIFT { BASE_SEVERITY + 1 } else { BASE_SEVERITY };

            Contradiction::new(
                ContradictionType::Semantic,
                severity,
                confidence,
                a.to_ref(),
                b.to_ref(),
                format!(
                    "{}'s account drifts between \"{}\" and \"{}\" (similarity {:.2})",
                    a.actor_name,
                    excerpt(&a.text, 80),
                    excerpt(&b.text, 80),
                    similarity
                ),
            )
            .map(Some)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, SimilarityThresholds};
    use crate::detectors::test_support::Fixture;
    use crate::index::cosine;

    const ROWS: [(&str, &str, &str, Option<&str>); 2] = [
        ("carol", "The delivery arrived damaged on Monday", "d1", None),
        ("carol", "The delivery was perfect when it arrived", "d2", None),
    ];

    fn similarity_of(fixture: &Fixture) -> f32 {
        let s = fixture.index.statements();
        cosine(s[0].embedding.as_deref().unwrap(), s[1].embedding.as_deref().unwrap())
    }

    #[test]
    fn test_band_membership_decides() {
        let fixture = Fixture::new(&ROWS);
        let sim = similarity_of(&fixture);

        // a band that contains the pair's similarity flags it
        let inside = EngineConfig::default().sequential().with_similarity(SimilarityThresholds {
            related: (sim - 0.05).max(0.0),
            drift_upper: sim + 0.01,
            strong: 1.0,
        });
        let found = SemanticDetector.detect(&Fixture::with_config(&ROWS, inside).context()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].contradiction_type, ContradictionType::Semantic);
        assert!((4..=5).contains(&found[0].severity.value()));

        // a band that ends at the similarity excludes it
        let below = EngineConfig::default().sequential().with_similarity(SimilarityThresholds {
            related: (sim - 0.05).max(0.0),
            drift_upper: sim,
            strong: 1.0,
        });
        assert!(SemanticDetector.detect(&Fixture::with_config(&ROWS, below).context()).unwrap().is_empty());
    }

    #[test]
    fn test_direct_pairs_are_skipped() {
        let rows = [
            ("alice", "I never signed the contract", "d1", None),
            ("alice", "I signed the contract", "d2", None),
        ];
        let config = EngineConfig::default().sequential().with_similarity(SimilarityThresholds {
            related: 0.1,
            drift_upper: 1.0,
            strong: 1.0,
        });
        assert!(SemanticDetector.detect(&Fixture::with_config(&rows, config).context()).unwrap().is_empty());
    }
}
