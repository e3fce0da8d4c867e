//! Direct contradictions: one actor, two related statements, opposite polarity.

use super::{ContradictionDetector, DetectionContext};
use crate::error::Result;
use crate::model::{Contradiction, ContradictionType, LegalTrigger};
use crate::utils::excerpt;

const BASE_SEVERITY: i64 = 6;

pub struct DirectDetector;

impl ContradictionDetector for DirectDetector {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        let pairs = ctx.same_actor_pairs();
        let window_secs = ctx.config.timeline.intentional_window_hours * 3600;

        ctx.evaluate(&pairs, |(a, b)| {
            let similarity = ctx.similarity.between(a, b);
            if !ctx.similarity.is_direct_contradiction(similarity, &a.text, &b.text) {
                return Ok(None);
            }

            let significant = a.category.is_legally_significant() && b.category.is_legally_significant();
            let intentional = a.seconds_apart(b).is_some_and(|secs| secs <= window_secs);

            let mut severity = BASE_SEVERITY;
            if significant {
                severity += 2;
            }
            if intentional {
                severity += 1;
            }

            let mut explanation = format!(
                "{} said \"{}\" but also \"{}\" (similarity {:.2})",
                a.actor_name,
                excerpt(&a.text, 80),
                excerpt(&b.text, 80),
                similarity
            );
            if intentional {
                explanation.push_str(", within hours of each other");
            }

            let contradiction = Contradiction::new(
                ContradictionType::Direct,
                severity,
                ctx.similarity.direct_confidence(similarity),
                a.to_ref(),
                b.to_ref(),
                explanation,
            )?;
            Ok(Some(if significant {
                contradiction.with_trigger(LegalTrigger::FalseStatement)
            } else {
                contradiction
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::Fixture;

    #[test]
    fn test_negation_flip_is_flagged() {
        let fixture = Fixture::new(&[
            ("alice", "I never signed the contract", "email-1", Some("2023-01-01 10:00")),
            ("alice", "I signed the contract", "email-2", Some("2023-02-01 10:00")),
        ]);
        let found = DirectDetector.detect(&fixture.context()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity.value(), 8);
        assert_eq!(found[0].legal_trigger, Some(LegalTrigger::FalseStatement));
        assert!(found[0].confidence > 0.99);
    }

    #[test]
    fn test_close_in_time_adds_severity() {
        let fixture = Fixture::new(&[
            ("alice", "I never signed the contract", "email-1", Some("2023-01-01 10:00")),
            ("alice", "I signed the contract", "email-2", Some("2023-01-01 18:00")),
        ]);
        let found = DirectDetector.detect(&fixture.context()).unwrap();
        assert_eq!(found[0].severity.value(), 9);
    }

    #[test]
    fn test_different_actors_never_compared() {
        let fixture = Fixture::new(&[
            ("alice", "I never signed the contract", "d1", None),
            ("bob", "I signed the contract", "d2", None),
        ]);
        assert!(DirectDetector.detect(&fixture.context()).unwrap().is_empty());
    }

    #[test]
    fn test_same_polarity_not_flagged() {
        let fixture = Fixture::new(&[
            ("alice", "I signed the contract", "d1", None),
            ("alice", "I signed the contract yesterday", "d2", None),
        ]);
        assert!(DirectDetector.detect(&fixture.context()).unwrap().is_empty());
    }
}
