//! Claims and financial figures derived from statements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::statement::{LegalCategory, Statement};
use crate::utils::text::{significant_words, set_overlap};

/// Category of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCategory {
    Admission,
    Denial,
    Promise,
    Assertion,
    Financial,
    Factual,
}

impl From<LegalCategory> for ClaimCategory {
    fn from(category: LegalCategory) -> Self {
        match category {
            LegalCategory::Admission => ClaimCategory::Admission,
            LegalCategory::Denial => ClaimCategory::Denial,
            LegalCategory::Promise => ClaimCategory::Promise,
            LegalCategory::Financial => ClaimCategory::Financial,
            LegalCategory::Factual => ClaimCategory::Factual,
            LegalCategory::Threat | LegalCategory::General => ClaimCategory::Assertion,
        }
    }
}

impl ClaimCategory {
    /// A denial stands against every affirmative category
    pub fn opposes(&self, other: &ClaimCategory) -> bool {
        (*self == ClaimCategory::Denial) != (*other == ClaimCategory::Denial)
    }
}

/// Words that mark the category of a claim rather than its subject
const CUE_WORDS: &[&str] = &[
    "admit", "admitted", "confess", "deny", "denied", "promise", "promised", "swear", "guarantee",
    "true", "false", "sorry", "fault", "wrong", "happened",
];

/// A categorized assertion derived from one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub statement_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub category: ClaimCategory,
    pub document_id: String,
    /// Sorted significant words with category cues removed
    pub subject: String,
}

impl Claim {
    pub fn from_statement(statement: &Statement) -> Self {
        Self {
            statement_id: statement.id.clone(),
            text: statement.text.clone(),
            timestamp: statement.timestamp,
            category: statement.category.into(),
            document_id: statement.document_id.clone(),
            subject: Self::subject_of(&statement.text),
        }
    }

    pub fn subject_of(text: &str) -> String {
        let mut words: Vec<String> = significant_words(text)
            .into_iter()
            .filter(|w| !CUE_WORDS.contains(&w.as_str()))
            .collect();
        words.sort();
        words.dedup();
        words.truncate(5);
        words.join(" ")
    }

    /// Non-blank subjects that are equal or share at least half their words
    pub fn shares_subject(&self, other: &Claim) -> bool {
        if self.subject.is_empty() || other.subject.is_empty() {
            return false;
        }
        if self.subject == other.subject {
            return true;
        }
        let a = self.subject.split(' ').map(str::to_string).collect();
        let b = other.subject.split(' ').map(str::to_string).collect();
        set_overlap(&a, &b) >= 0.5
    }
}

/// A monetary amount mentioned in a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialFigure {
    pub statement_id: String,
    pub amount: f64,
    /// ISO 4217 code
    pub currency: String,
    pub description: String,
    /// Normalized context used to group figures for drift detection
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub document_id: String,
}
