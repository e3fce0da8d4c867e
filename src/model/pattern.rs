//! Behavioral pattern types
//!
//! Each pattern kind carries a typed evidence payload instead of a loose
//! key/value bag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Gaslighting,
    Deflection,
    PressureTactics,
    FinancialManipulation,
    EmotionalManipulation,
    OverExplaining,
    BlameShifting,
    PassiveAdmission,
    Ghosting,
    SuddenWithdrawal,
    DelayedResponse,
}

impl PatternKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gaslighting => "Gaslighting",
            Self::Deflection => "Deflection",
            Self::PressureTactics => "Pressure tactics",
            Self::FinancialManipulation => "Financial manipulation",
            Self::EmotionalManipulation => "Emotional manipulation",
            Self::OverExplaining => "Over-explaining",
            Self::BlameShifting => "Blame-shifting",
            Self::PassiveAdmission => "Passive admission",
            Self::Ghosting => "Ghosting",
            Self::SuddenWithdrawal => "Sudden withdrawal",
            Self::DelayedResponse => "Delayed response",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PatternSeverity {
    /// 1 → low, 2 → medium, 3-4 → high, 5+ → critical
    pub fn from_instance_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Low,
            2 => Self::Medium,
            3 | 4 => Self::High,
            _ => Self::Critical,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            Self::Low => 0.4,
            Self::Medium => 0.6,
            Self::High => 0.8,
            Self::Critical => 0.95,
        }
    }
}

/// One match supporting a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInstance {
    /// Statement or timeline event the match came from
    pub source_id: String,
    /// Matched phrase or a short description of the measured gap
    pub matched: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Typed payload per pattern family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "evidence", rename_all = "snake_case")]
pub enum PatternEvidence {
    Keyword {
        phrases: Vec<String>,
    },
    Ghosting {
        longest_gap_days: f64,
        gap_start: DateTime<Utc>,
        gap_end: DateTime<Utc>,
    },
    SuddenWithdrawal {
        first_half_events: usize,
        second_half_events: usize,
        ratio: f64,
    },
    DelayedResponse {
        longest_delay_days: f64,
        delayed_count: usize,
    },
}

/// A behavioral red flag detected for one actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralPattern {
    pub actor: String,
    pub kind: PatternKind,
    pub severity: PatternSeverity,
    /// 0.0 ..= 1.0
    pub confidence: f32,
    pub instances: Vec<PatternInstance>,
    pub description: String,
    pub evidence: PatternEvidence,
}
