//! Cross-entity contradictions: two actors taking opposite positions on the
//! same subject.

use super::{ContradictionDetector, DetectionContext};
use crate::error::Result;
use crate::index::statements_contradict;
use crate::model::{Claim, ClaimCategory, Contradiction, ContradictionType};
use crate::utils::excerpt;

const BASE_SEVERITY: i64 = 5;

pub struct CrossEntityDetector;

impl ContradictionDetector for CrossEntityDetector {
    fn name(&self) -> &'static str {
        "cross_entity"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        let profiles: Vec<_> = ctx.profiles.values().collect();
        if profiles.len() < 2 {
            return Ok(Vec::new());
        }

        let mut pairs: Vec<(&Claim, &Claim)> = Vec::new();
        for (i, p) in profiles.iter().enumerate() {
            for q in &profiles[i + 1..] {
                for a in &p.claims {
                    for b in &q.claims {
                        if a.category.opposes(&b.category) {
                            pairs.push((a, b));
                        }
                    }
                }
            }
        }

        ctx.evaluate(&pairs, |(a, b)| {
            let shared = a.shares_subject(b);
            let conflicting = statements_contradict(&a.text, &b.text);
            if !shared && !conflicting {
                return Ok(None);
            }

            let involves = |category: ClaimCategory| a.category == category || b.category == category;
            let mut severity = BASE_SEVERITY;
            if involves(ClaimCategory::Factual) {
                severity += 2;
            }
            if involves(ClaimCategory::Financial) {
                severity += 2;
            }
            let confidence = match (shared, conflicting) {
                (true, true) => 0.8,
                (true, false) => 0.6,
                _ => 0.5,
            };

            let first = ctx.statement_ref(&a.statement_id)?;
            let second = ctx.statement_ref(&b.statement_id)?;
            let explanation = format!(
                "{} and {} disagree: \"{}\" / \"{}\"",
                first.actor,
                second.actor,
                excerpt(&a.text, 80),
                excerpt(&b.text, 80)
            );
            Contradiction::new(ContradictionType::CrossDocument, severity, confidence, first, second, explanation).map(Some)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::Fixture;

    #[test]
    fn test_opposing_actors_on_shared_subject() {
        let fixture = Fixture::new(&[
            ("ivan", "I returned the keys to the office", "d1", None),
            ("jill", "That is not true, he never returned the keys to the office", "d2", None),
        ]);
        let found = CrossEntityDetector.detect(&fixture.context()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].contradiction_type, ContradictionType::CrossDocument);
        assert_eq!(found[0].affected_actors, vec!["ivan".to_string(), "jill".to_string()]);
    }

    #[test]
    fn test_financial_claims_raise_severity() {
        let fixture = Fixture::new(&[
            ("ivan", "The deposit of $500 was refunded", "d1", None),
            ("jill", "I never got the deposit refunded", "d2", None),
        ]);
        let found = CrossEntityDetector.detect(&fixture.context()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity.value(), 7);
    }

    #[test]
    fn test_factual_claims_raise_severity() {
        let fixture = Fixture::new(&[
            ("ivan", "The meeting took place at the office on Monday", "d1", None),
            ("jill", "That is not true, the meeting never took place at the office", "d2", None),
        ]);
        let found = CrossEntityDetector.detect(&fixture.context()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity.value(), 7);
    }

    #[test]
    fn test_single_actor_has_no_cross_contradictions() {
        let fixture = Fixture::new(&[
            ("ivan", "I returned the keys", "d1", None),
            ("ivan", "I never returned the keys", "d2", None),
        ]);
        assert!(CrossEntityDetector.detect(&fixture.context()).unwrap().is_empty());
    }

    #[test]
    fn test_agreeing_actors_are_fine() {
        let fixture = Fixture::new(&[
            ("ivan", "I returned the keys to the office", "d1", None),
            ("jill", "He returned the keys to the office", "d2", None),
        ]);
        assert!(CrossEntityDetector.detect(&fixture.context()).unwrap().is_empty());
    }
}
