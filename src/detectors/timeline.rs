//! Timeline contradictions
//!
//! - causality: an effect dated before its cause for the same actor
//! - date mismatch: the same event described on different days in
//!   different documents
//! - impossible sequence: one actor in two documents minutes apart, saying
//!   unrelated things

use std::collections::BTreeMap;

use super::{ContradictionDetector, DetectionContext};
use crate::error::Result;
use crate::model::{Contradiction, ContradictionType, LegalTrigger, TimelineEvent};
use crate::utils::excerpt;
use crate::utils::text::{description_key, has_phrase, normalize_phrases, significant_words, word_overlap};

/// (cause, effect): the effect cannot precede the cause
const CAUSALITY_RULES: &[(&str, &str)] = &[
    ("invoice", "paid"),
    ("ordered", "delivered"),
    ("requested", "approved"),
    ("applied", "approved"),
    ("signed", "breached"),
    ("hired", "fired"),
    ("borrowed", "repaid"),
    ("loan", "repaid"),
    ("agreed", "cancelled"),
    ("booked", "cancelled"),
    ("contract", "terminated"),
];

const CAUSALITY_SEVERITY: i64 = 8;
const IMPOSSIBLE_SEVERITY: i64 = 6;
const DESCRIPTION_KEY_WORDS: usize = 5;

/// Severity for a date mismatch of `days` whole days
fn mismatch_severity(days: i64) -> i64 {
    match days {
        d if d >= 365 => 9,
        d if d >= 90 => 8,
        d if d >= 30 => 7,
        d if d >= 7 => 6,
        d if d >= 1 => 4,
        _ => 2,
    }
}

pub struct TimelineDetector;

impl TimelineDetector {
    fn events_by_actor<'e>(timeline: &'e [TimelineEvent]) -> BTreeMap<&'e str, Vec<&'e TimelineEvent>> {
        let mut grouped: BTreeMap<&str, Vec<&TimelineEvent>> = BTreeMap::new();
        for event in timeline {
            for actor in &event.actors {
                grouped.entry(actor.as_str()).or_default().push(event);
            }
        }
        grouped
    }

    fn contradiction(
        ctx: &DetectionContext<'_>,
        kind_severity: i64,
        confidence: f32,
        first: &TimelineEvent,
        second: &TimelineEvent,
        explanation: String,
    ) -> Result<Option<Contradiction>> {
        let (Some(a), Some(b)) = (first.statement_ids.first(), second.statement_ids.first()) else {
            return Ok(None);
        };
        Contradiction::new(
            ContradictionType::Timeline,
            kind_severity,
            confidence,
            ctx.statement_ref(a)?,
            ctx.statement_ref(b)?,
            explanation,
        )
        .map(Some)
    }

    fn causality(ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        let mut found = Vec::new();

        for (actor, events) in Self::events_by_actor(ctx.timeline) {
            let normalized: Vec<String> = events.iter().map(|e| normalize_phrases(&e.description)).collect();

            for (cause, effect) in CAUSALITY_RULES {
                // events are time-sorted, so the first match is the earliest.
                // An event naming both cause and effect counts as neither.
                let first_effect = events
                    .iter()
                    .zip(&normalized)
                    .find(|(_, n)| has_phrase(n, effect) && !has_phrase(n, cause));
                let first_cause = events
                    .iter()
                    .zip(&normalized)
                    .find(|(_, n)| has_phrase(n, cause) && !has_phrase(n, effect));

                let (Some((effect_event, _)), Some((cause_event, _))) = (first_effect, first_cause) else {
                    continue;
                };
                if effect_event.timestamp >= cause_event.timestamp {
                    continue;
                }

                let explanation = format!(
                    "{} reports \"{}\" ({}) before \"{}\" ({})",
                    actor,
                    effect,
                    effect_event.timestamp.format("%Y-%m-%d"),
                    cause,
                    cause_event.timestamp.format("%Y-%m-%d")
                );
                if let Some(c) = Self::contradiction(ctx, CAUSALITY_SEVERITY, 0.8, effect_event, cause_event, explanation)? {
                    found.push(c.with_trigger(LegalTrigger::FabricatedChronology));
                }
            }
        }
        Ok(found)
    }

    fn date_mismatch(ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        let mut groups: BTreeMap<String, Vec<&TimelineEvent>> = BTreeMap::new();
        for event in ctx.timeline {
            let key = description_key(&event.description, DESCRIPTION_KEY_WORDS);
            if key.split(' ').count() >= 2 {
                groups.entry(key).or_default().push(event);
            }
        }

        let mut pairs = Vec::new();
        for events in groups.values() {
            for (i, a) in events.iter().enumerate() {
                for b in &events[i + 1..] {
                    if a.document_id != b.document_id && a.timestamp.date_naive() != b.timestamp.date_naive() {
                        pairs.push((*a, *b));
                    }
                }
            }
        }

        ctx.evaluate(&pairs, |(a, b)| {
            let days = (b.timestamp - a.timestamp).num_days().abs();
            let explanation = format!(
                "\"{}\" is dated {} in {} but {} in {}",
                excerpt(&a.description, 60),
                a.timestamp.format("%Y-%m-%d"),
                a.document_id,
                b.timestamp.format("%Y-%m-%d"),
                b.document_id
            );
            Self::contradiction(ctx, mismatch_severity(days), 0.7, a, b, explanation)
        })
    }

    fn impossible_sequence(ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        let window_secs = ctx.config.timeline.impossible_window_minutes * 60;

        let mut pairs = Vec::new();
        for events in Self::events_by_actor(ctx.timeline).into_values() {
            for (i, a) in events.iter().enumerate() {
                // sorted by time, so stop once outside the window
                for b in events[i + 1..]
                    .iter()
                    .take_while(|b| (b.timestamp - a.timestamp).num_seconds() <= window_secs)
                {
                    if a.document_id != b.document_id {
                        pairs.push((*a, *b));
                    }
                }
            }
        }

        ctx.evaluate(&pairs, |(a, b)| {
            if significant_words(&a.description).is_empty() || significant_words(&b.description).is_empty() {
                return Ok(None);
            }
            if word_overlap(&a.description, &b.description) > 0.0 {
                return Ok(None);
            }
            let explanation = format!(
                "Unrelated accounts in {} and {} only {} seconds apart",
                a.document_id,
                b.document_id,
                (b.timestamp - a.timestamp).num_seconds()
            );
            Self::contradiction(ctx, IMPOSSIBLE_SEVERITY, 0.5, a, b, explanation)
        })
    }
}

impl ContradictionDetector for TimelineDetector {
    fn name(&self) -> &'static str {
        "timeline"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
        if ctx.timeline.len() < 2 {
            return Ok(Vec::new());
        }
        let mut found = Self::causality(ctx)?;
        found.extend(Self::date_mismatch(ctx)?);
        found.extend(Self::impossible_sequence(ctx)?);
        Ok(found)
    }
}
