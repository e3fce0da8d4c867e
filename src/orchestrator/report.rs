//! Analysis input and report types
//!
//! The report is the engine's single output value. Its JSON form is the
//! stable schema downstream renderers and fixtures rely on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{
    Actor, BehavioralPattern, Contradiction, EntityProfile, LiabilityEntry, RawStatement, Severity, Statement,
    TimelineEvent,
};

/// Everything one run needs: identity hints and the raw statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub statements: Vec<RawStatement>,
}

impl AnalysisInput {
    pub fn new(statements: Vec<RawStatement>) -> Self {
        Self { actors: Vec::new(), statements }
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actors.push(actor);
        self
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Headline numbers of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub statement_count: usize,
    pub actor_count: usize,
    pub event_count: usize,
    pub contradiction_count: usize,
    /// Keyed by contradiction type tag
    pub contradictions_by_type: BTreeMap<String, usize>,
    pub pattern_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_severity: Option<Severity>,
    /// Highest liability total; ties go to the smallest actor key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_liability_actor: Option<String>,
}

impl ReportSummary {
    pub fn compute(
        statements: &[Statement],
        profiles: &BTreeMap<String, EntityProfile>,
        timeline: &[TimelineEvent],
        contradictions: &[Contradiction],
        patterns: &[BehavioralPattern],
        liability: &BTreeMap<String, LiabilityEntry>,
    ) -> Self {
        let mut contradictions_by_type = BTreeMap::new();
        for c in contradictions {
            *contradictions_by_type.entry(c.contradiction_type.as_str().to_string()).or_insert(0) += 1;
        }

        // BTreeMap iterates in key order, so the first strict maximum wins ties
        let mut top: Option<&LiabilityEntry> = None;
        for entry in liability.values() {
            if top.map_or(true, |best| entry.total > best.total) {
                top = Some(entry);
            }
        }

        Self {
            statement_count: statements.len(),
            actor_count: profiles.len(),
            event_count: timeline.len(),
            contradiction_count: contradictions.len(),
            contradictions_by_type,
            pattern_count: patterns.len(),
            highest_severity: contradictions.iter().map(|c| c.severity).max(),
            top_liability_actor: top.map(|e| e.actor.clone()),
        }
    }
}

/// Structured output of a completed run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub statements: Vec<Statement>,
    /// Time-sorted
    pub timeline: Vec<TimelineEvent>,
    pub profiles: BTreeMap<String, EntityProfile>,
    /// Severity-sorted, highest first
    pub contradictions: Vec<Contradiction>,
    pub behavioral_patterns: Vec<BehavioralPattern>,
    pub liability: BTreeMap<String, LiabilityEntry>,
    pub summary: ReportSummary,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LiabilityWeights;
    use crate::model::LiabilityScores;

    #[test]
    fn test_input_parses_minimal_json() {
        let input = AnalysisInput::from_json(
            r#"{"statements": [{"actor": "Ann", "text": "Hello", "timestamp": "2023-01-01"}]}"#,
        )
        .unwrap();
        assert!(input.actors.is_empty());
        assert_eq!(input.statements.len(), 1);
        assert_eq!(input.statements[0].document_id, "");
    }

    #[test]
    fn test_top_liability_ties_go_to_smallest_key() {
        let weights = LiabilityWeights::standard();
        let scores = LiabilityScores { contradiction: 0.5, consistency: 1.0, ..Default::default() };
        let mut liability = BTreeMap::new();
        liability.insert("zed".to_string(), LiabilityEntry::new("zed", scores, &weights));
        liability.insert("amy".to_string(), LiabilityEntry::new("amy", scores, &weights));

        let summary = ReportSummary::compute(&[], &BTreeMap::new(), &[], &[], &[], &liability);
        assert_eq!(summary.top_liability_actor.as_deref(), Some("amy"));
        assert_eq!(summary.highest_severity, None);
    }

    #[test]
    fn test_empty_report_round_trips() {
        let report = AnalysisReport::default();
        let json = report.to_json().unwrap();
        assert_eq!(AnalysisReport::from_json(&json).unwrap(), report);
    }
}
