//! Contradiction types
//!
//! A contradiction always carries a severity in 1..=10. The range is
//! enforced at construction and again on deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::statement::StatementRef;
use crate::error::{EngineError, Result};

/// Severity on a 1..=10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(EngineError::SeverityOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Severity {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionType {
    /// Same actor, related statements, opposite polarity
    Direct,
    /// Same actor, related statements drifting apart
    Semantic,
    /// Chronology that cannot be right
    Timeline,
    /// Admission and denial inside one profile
    Entity,
    /// Opposing claims from different actors
    CrossDocument,
    /// The same amount reported differently over time
    Financial,
}

impl ContradictionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Semantic => "semantic",
            Self::Timeline => "timeline",
            Self::Entity => "entity",
            Self::CrossDocument => "cross_document",
            Self::Financial => "financial",
        }
    }
}

impl fmt::Display for ContradictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal significance attached to a contradiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalTrigger {
    FalseStatement,
    FinancialMisrepresentation,
    Concealment,
    FabricatedChronology,
}

/// A flagged inconsistency between two statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    pub contradiction_type: ContradictionType,
    pub severity: Severity,
    /// 0.0 ..= 1.0
    pub confidence: f32,
    pub statement_a: StatementRef,
    pub statement_b: StatementRef,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_trigger: Option<LegalTrigger>,
    pub affected_actors: Vec<String>,
}

impl Contradiction {
    /// Fails when `severity` falls outside 1..=10
    pub fn new(
        contradiction_type: ContradictionType,
        severity: i64,
        confidence: f32,
        statement_a: StatementRef,
        statement_b: StatementRef,
        explanation: impl Into<String>,
    ) -> Result<Self> {
        let severity = Severity::new(severity)?;
        let mut affected_actors = vec![statement_a.actor.clone(), statement_b.actor.clone()];
        affected_actors.sort();
        affected_actors.dedup();

        Ok(Self {
            contradiction_type,
            severity,
            confidence: confidence.clamp(0.0, 1.0),
            statement_a,
            statement_b,
            explanation: explanation.into(),
            legal_trigger: None,
            affected_actors,
        })
    }

    pub fn with_trigger(mut self, trigger: LegalTrigger) -> Self {
        self.legal_trigger = Some(trigger);
        self
    }

    pub fn involves(&self, actor: &str) -> bool {
        self.affected_actors.iter().any(|a| a == actor)
    }

    /// Unordered id pair of the two statements
    pub fn statement_pair(&self) -> (&str, &str) {
        let (a, b) = (self.statement_a.id.as_str(), self.statement_b.id.as_str());
        if a <= b { (a, b) } else { (b, a) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(id: &str, actor: &str) -> StatementRef {
        StatementRef {
            id: id.to_string(),
            actor: actor.to_string(),
            text: "text".to_string(),
            document_id: "doc".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_severity_bounds() {
        assert!(Severity::new(0).is_err());
        assert!(Severity::new(11).is_err());
        assert_eq!(Severity::new(10).unwrap().value(), 10);
    }

    #[test]
    fn test_construction_rejects_bad_severity() {
        let result = Contradiction::new(ContradictionType::Direct, 11, 0.5, stmt("a", "x"), stmt("b", "x"), "bad");
        assert!(matches!(result, Err(EngineError::SeverityOutOfRange(11))));
    }

    #[test]
    fn test_severity_deserialization_is_validated() {
        assert!(serde_json::from_str::<Severity>("7").is_ok());
        assert!(serde_json::from_str::<Severity>("0").is_err());
        assert_eq!(serde_json::to_string(&Severity::new(7).unwrap()).unwrap(), "7");
    }

    #[test]
    fn test_affected_actors_deduplicated() {
        let c = Contradiction::new(ContradictionType::Direct, 6, 0.9, stmt("b", "x"), stmt("a", "x"), "same actor").unwrap();
        assert_eq!(c.affected_actors, vec!["x".to_string()]);
        assert_eq!(c.statement_pair(), ("a", "b"));
    }
}
