//! Behavioral Pattern Detector
//!
//! Two families of red flags per actor:
//! - keyword patterns matched against everything the actor said
//! - timing patterns measured on the actor's timeline events

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::config::BehaviorConfig;
use crate::index::StatementIndex;
use crate::model::{
    BehavioralPattern, EventType, PatternEvidence, PatternInstance, PatternKind, PatternSeverity, TimelineEvent,
};
use crate::utils::text::{count_phrase, normalize_phrases};

const KEYWORD_PATTERNS: &[(PatternKind, &[&str])] = &[
    (
        PatternKind::Gaslighting,
        &[
            "you're imagining", "you are imagining", "that never happened", "you're crazy",
            "you are crazy", "you're being paranoid", "you're overreacting", "you're remembering it wrong",
            "i never said that", "you misunderstood", "you're confused", "that's not what happened",
        ],
    ),
    (
        PatternKind::Deflection,
        &[
            "what about you", "that's not the point", "why are you bringing", "let's not talk about",
            "change the subject", "that's irrelevant", "moving on", "not important right now",
        ],
    ),
    (
        PatternKind::PressureTactics,
        &[
            "right now", "immediately", "last chance", "before it's too late", "you have to",
            "you must", "final offer", "don't tell anyone", "no time to think",
        ],
    ),
    (
        PatternKind::FinancialManipulation,
        &[
            "you owe me", "pay me back", "i'll cut you off", "my money", "you can't afford",
            "i paid for everything", "give me the money", "sign it over",
        ],
    ),
    (
        PatternKind::EmotionalManipulation,
        &[
            "after everything i've done", "you don't love me", "if you really cared", "you're hurting me",
            "you'll be sorry", "nobody else will", "look what you made me",
        ],
    ),
    (
        PatternKind::OverExplaining,
        &[
            "to be honest", "honestly", "let me explain", "the thing is", "as i said before",
            "believe me", "trust me", "i swear", "to be clear",
        ],
    ),
    (
        PatternKind::BlameShifting,
        &[
            "it's your fault", "you made me do", "because of you", "if you hadn't", "not my fault",
            "you started it", "you caused",
        ],
    ),
    (
        PatternKind::PassiveAdmission,
        &[
            "mistakes were made", "it might have happened", "i may have", "i might have",
            "things got out of hand", "it's possible that", "i don't remember", "i can't recall",
        ],
    ),
];

fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (b - a).num_seconds() as f64 / 86_400.0
}

pub struct BehavioralPatternDetector {
    config: BehaviorConfig,
}

impl BehavioralPatternDetector {
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    /// All patterns for all actors. Actors come out in key order, and each
    /// actor's keyword patterns precede its timing patterns.
    pub fn detect(&self, index: &StatementIndex, timeline: &[TimelineEvent]) -> Vec<BehavioralPattern> {
        let mut events_by_actor: BTreeMap<&str, Vec<&TimelineEvent>> = BTreeMap::new();
        for event in timeline {
            for actor in &event.actors {
                events_by_actor.entry(actor.as_str()).or_default().push(event);
            }
        }

        let mut patterns = Vec::new();
        for actor in index.actors() {
            patterns.extend(self.keyword_patterns(&actor, index));

            if let Some(events) = events_by_actor.get(actor.as_str()) {
                patterns.extend(self.ghosting(&actor, events));
                patterns.extend(self.sudden_withdrawal(&actor, events));
                patterns.extend(self.delayed_response(&actor, events));
            }
        }

        info!("Detected {} behavioral patterns", patterns.len());
        patterns
    }

    fn keyword_patterns(&self, actor: &str, index: &StatementIndex) -> Vec<BehavioralPattern> {
        let statements: Vec<_> = index
            .by_actor(actor)
            .into_iter()
            .map(|s| (s, normalize_phrases(&s.text)))
            .collect();

        let mut found = Vec::new();
        for (kind, phrases) in KEYWORD_PATTERNS {
            let mut instances = Vec::new();
            let mut matched = BTreeSet::new();

            for (statement, normalized) in &statements {
                for phrase in phrases.iter() {
                    let hits = count_phrase(normalized, phrase);
                    for _ in 0..hits {
                        instances.push(PatternInstance {
                            source_id: statement.id.clone(),
                            matched: phrase.to_string(),
                            timestamp: statement.timestamp,
                        });
                    }
                    if hits > 0 {
                        matched.insert(phrase.to_string());
                    }
                }
            }

            if instances.is_empty() {
                continue;
            }

            let severity = PatternSeverity::from_instance_count(instances.len());
            found.push(BehavioralPattern {
                actor: actor.to_string(),
                kind: *kind,
                severity,
                confidence: severity.confidence(),
                description: format!("{} language used {} time(s)", kind.label(), instances.len()),
                instances,
                evidence: PatternEvidence::Keyword { phrases: matched.into_iter().collect() },
            });
        }
        found
    }

    /// Any gap between consecutive events longer than the ghosting threshold
    fn ghosting(&self, actor: &str, events: &[&TimelineEvent]) -> Option<BehavioralPattern> {
        let mut instances = Vec::new();
        let mut longest: Option<(f64, DateTime<Utc>, DateTime<Utc>)> = None;

        for pair in events.windows(2) {
            let gap = days_between(pair[0].timestamp, pair[1].timestamp);
            if gap <= self.config.ghosting_gap_days {
                continue;
            }
            instances.push(PatternInstance {
                source_id: pair[1].id.clone(),
                matched: format!("silent for {:.1} days", gap),
                timestamp: Some(pair[1].timestamp),
            });
            if longest.map_or(true, |(g, _, _)| gap > g) {
                longest = Some((gap, pair[0].timestamp, pair[1].timestamp));
            }
        }

        let (gap, gap_start, gap_end) = longest?;
        Some(BehavioralPattern {
            actor: actor.to_string(),
            kind: PatternKind::Ghosting,
            severity: PatternSeverity::from_instance_count(instances.len()),
            confidence: (0.5 + gap / 60.0).min(1.0) as f32,
            description: format!("Went silent for {:.1} days", gap),
            instances,
            evidence: PatternEvidence::Ghosting { longest_gap_days: gap, gap_start, gap_end },
        })
    }

    /// Second half of the actor's active span is much quieter than the first
    fn sudden_withdrawal(&self, actor: &str, events: &[&TimelineEvent]) -> Option<BehavioralPattern> {
        if events.len() < self.config.withdrawal_min_events {
            return None;
        }
        let first = events.first()?.timestamp;
        let last = events.last()?.timestamp;
        if last <= first {
            return None;
        }
        let midpoint = first + (last - first) / 2;

        let first_half = events.iter().filter(|e| e.timestamp < midpoint).count();
        let second: Vec<&&TimelineEvent> = events.iter().filter(|e| e.timestamp >= midpoint).collect();
        if first_half == 0 {
            return None;
        }

        let ratio = second.len() as f64 / first_half as f64;
        if ratio >= self.config.withdrawal_ratio {
            return None;
        }

        let severity = if ratio < self.config.withdrawal_ratio / 2.0 {
            PatternSeverity::High
        } else {
            PatternSeverity::Medium
        };
        Some(BehavioralPattern {
            actor: actor.to_string(),
            kind: PatternKind::SuddenWithdrawal,
            severity,
            confidence: (1.0 - ratio).clamp(0.0, 1.0) as f32,
            description: format!(
                "Activity dropped from {} to {} events between the two halves of the period",
                first_half,
                second.len()
            ),
            instances: second
                .iter()
                .map(|e| PatternInstance {
                    source_id: e.id.clone(),
                    matched: "late-period event".to_string(),
                    timestamp: Some(e.timestamp),
                })
                .collect(),
            evidence: PatternEvidence::SuddenWithdrawal {
                first_half_events: first_half,
                second_half_events: second.len(),
                ratio,
            },
        })
    }

    /// The first communication after a payment arrives too late
    fn delayed_response(&self, actor: &str, events: &[&TimelineEvent]) -> Option<BehavioralPattern> {
        let mut instances = Vec::new();
        let mut longest = 0.0f64;

        for (i, payment) in events.iter().enumerate().filter(|(_, e)| e.event_type == EventType::Payment) {
            let reply = events[i + 1..]
                .iter()
                .find(|e| e.event_type == EventType::Communication && e.timestamp > payment.timestamp);
            let Some(reply) = reply else { continue };

            let delay = days_between(payment.timestamp, reply.timestamp);
            if delay > self.config.delayed_response_days {
                instances.push(PatternInstance {
                    source_id: reply.id.clone(),
                    matched: format!("responded {:.1} days after payment {}", delay, payment.id),
                    timestamp: Some(reply.timestamp),
                });
                longest = longest.max(delay);
            }
        }

        if instances.is_empty() {
            return None;
        }

        let delayed_count = instances.len();
        Some(BehavioralPattern {
            actor: actor.to_string(),
            kind: PatternKind::DelayedResponse,
            severity: PatternSeverity::from_instance_count(delayed_count),
            confidence: (0.5 + longest / 30.0).min(1.0) as f32,
            description: format!("Responded late after {} payment(s), up to {:.1} days", delayed_count, longest),
            instances,
            evidence: PatternEvidence::DelayedResponse { longest_delay_days: longest, delayed_count },
        })
    }
}

impl Default for BehavioralPatternDetector {
    fn default() -> Self {
        Self::new(BehaviorConfig::default())
    }
}
