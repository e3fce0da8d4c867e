//! Entity profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::claim::{Claim, FinancialFigure};
use super::pattern::PatternKind;

/// A value of a per-statement signal at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub statement_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub value: f32,
}

/// Everything the engine knows about one actor in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityProfile {
    pub actor: String,
    pub display_name: String,
    /// Raw spellings that resolved to this actor
    pub aliases: Vec<String>,
    pub statement_ids: Vec<String>,
    pub claims: Vec<Claim>,
    pub financial_figures: Vec<FinancialFigure>,
    /// Sorted timestamps of the actor's dated statements
    pub timeline_footprint: Vec<DateTime<Utc>>,
    pub sentiment_trend: Vec<TrendPoint>,
    pub certainty_trend: Vec<TrendPoint>,
    pub patterns: BTreeSet<PatternKind>,
}

impl EntityProfile {
    pub fn new(actor: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            display_name: display_name.into(),
            aliases: Vec::new(),
            statement_ids: Vec::new(),
            claims: Vec::new(),
            financial_figures: Vec::new(),
            timeline_footprint: Vec::new(),
            sentiment_trend: Vec::new(),
            certainty_trend: Vec::new(),
            patterns: BTreeSet::new(),
        }
    }

    pub fn statement_count(&self) -> usize {
        self.statement_ids.len()
    }

    pub fn mean_sentiment(&self) -> f32 {
        mean(&self.sentiment_trend)
    }
}

fn mean(points: &[TrendPoint]) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.value).sum::<f32>() / points.len() as f32
}
