//! Engine Configuration
//!
//! Every threshold the detectors and the scorer depend on lives here, so
//! that alternate calibrations are a config change rather than a code path.
//! Loadable from JSON or YAML; a missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::EngineError;

const WEIGHT_EPSILON: f32 = 1e-4;

/// Cosine-similarity bands used by the contradiction heuristics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityThresholds {
    /// Two statements at or above this are considered to be about the same thing
    pub related: f32,
    /// Upper (exclusive) bound of the semantic-drift band
    pub drift_upper: f32,
    /// Near-identical phrasing; direct contradictions above it get full confidence
    pub strong: f32,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            related: 0.25,
            drift_upper: 0.45,
            strong: 0.70,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Number of hash buckets in every vector
    pub dimensions: usize,
    /// Weight of each character trigram relative to a whole token
    pub trigram_weight: f32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: 256,
            trigram_weight: 0.5,
        }
    }
}

/// Weights of the five liability sub-scores. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiabilityWeights {
    pub contradiction: f32,
    pub behavioral: f32,
    pub evidence: f32,
    /// Applied to `1 - consistency`
    pub inconsistency: f32,
    pub causal: f32,
}

impl LiabilityWeights {
    /// 0.30 / 0.20 / 0.15 / 0.20 / 0.15
    pub fn standard() -> Self {
        Self {
            contradiction: 0.30,
            behavioral: 0.20,
            evidence: 0.15,
            inconsistency: 0.20,
            causal: 0.15,
        }
    }

    /// 0.30 / 0.25 / 0.15 / 0.15 / 0.15, leaning on behavioral red flags
    pub fn behavior_weighted() -> Self {
        Self {
            contradiction: 0.30,
            behavioral: 0.25,
            evidence: 0.15,
            inconsistency: 0.15,
            causal: 0.15,
        }
    }

    pub fn sum(&self) -> f32 {
        self.contradiction + self.behavioral + self.evidence + self.inconsistency + self.causal
    }
}

impl Default for LiabilityWeights {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Two events closer than this from different documents must overlap textually
    pub impossible_window_minutes: i64,
    /// Direct contradictions inside this window read as intentional
    pub intentional_window_hours: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            impossible_window_minutes: 5,
            intentional_window_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub ghosting_gap_days: f64,
    /// Second-half event rate below this fraction of the first half is a withdrawal
    pub withdrawal_ratio: f64,
    pub withdrawal_min_events: usize,
    pub delayed_response_days: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            ghosting_gap_days: 7.0,
            withdrawal_ratio: 0.30,
            withdrawal_min_events: 5,
            delayed_response_days: 3.0,
        }
    }
}

/// Relative-change thresholds for financial drift (fractions, not percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    pub minor_drift: f64,
    pub major_drift: f64,
    pub severe_drift: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            minor_drift: 0.10,
            major_drift: 0.25,
            severe_drift: 0.50,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub similarity: SimilarityThresholds,
    pub embedding: EmbeddingConfig,
    pub liability: LiabilityWeights,
    pub timeline: TimelineConfig,
    pub behavior: BehaviorConfig,
    pub financial: FinancialConfig,
    /// Fan pair comparisons out over the rayon pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityThresholds::default(),
            embedding: EmbeddingConfig::default(),
            liability: LiabilityWeights::default(),
            timeline: TimelineConfig::default(),
            behavior: BehaviorConfig::default(),
            financial: FinancialConfig::default(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    pub fn with_liability_weights(mut self, weights: LiabilityWeights) -> Self {
        self.liability = weights;
        self
    }

    pub fn with_similarity(mut self, thresholds: SimilarityThresholds) -> Self {
        self.similarity = thresholds;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<(), EngineError> {
        let s = &self.similarity;
        if !(0.0..=1.0).contains(&s.related) || !(s.related < s.drift_upper && s.drift_upper <= s.strong && s.strong <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "similarity thresholds must satisfy 0 <= related < drift_upper <= strong <= 1 (got {} / {} / {})",
                s.related, s.drift_upper, s.strong
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(EngineError::InvalidConfig("embedding dimensions must be positive".to_string()));
        }
        if self.embedding.trigram_weight < 0.0 {
            return Err(EngineError::InvalidConfig("trigram weight must not be negative".to_string()));
        }

        let w = &self.liability;
        let weights = [w.contradiction, w.behavioral, w.evidence, w.inconsistency, w.causal];
        if weights.iter().any(|x| *x < 0.0) {
            return Err(EngineError::InvalidConfig("liability weights must not be negative".to_string()));
        }
        if (w.sum() - 1.0).abs() > WEIGHT_EPSILON {
            return Err(EngineError::InvalidConfig(format!(
                "liability weights must sum to 1.0 (got {:.6})",
                w.sum()
            )));
        }

        let f = &self.financial;
        if !(0.0 < f.minor_drift && f.minor_drift < f.major_drift && f.major_drift < f.severe_drift) {
            return Err(EngineError::InvalidConfig(
                "financial drift thresholds must be positive and strictly increasing".to_string(),
            ));
        }

        if self.timeline.impossible_window_minutes < 0 || self.timeline.intentional_window_hours < 0 {
            return Err(EngineError::InvalidConfig("timeline windows must not be negative".to_string()));
        }

        let b = &self.behavior;
        if b.ghosting_gap_days <= 0.0 || b.delayed_response_days <= 0.0 || !(0.0..=1.0).contains(&b.withdrawal_ratio) {
            return Err(EngineError::InvalidConfig(
                "behavior thresholds must be positive and the withdrawal ratio within 0..=1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Failed to parse JSON engine config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse YAML engine config")?;
        config.validate()?;
        Ok(config)
    }
}

/// Reads an `EngineConfig` from disk, picking the format from the extension
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config; a missing file falls back to `EngineConfig::default()`
    pub fn load(&self) -> Result<EngineConfig> {
        if !self.path.exists() {
            debug!("No engine config at {:?}, using defaults", self.path);
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read engine config {:?}", self.path))?;

        let ext = self.path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => EngineConfig::from_yaml_str(&content)?,
            _ => EngineConfig::from_json_str(&content)?,
        };

        info!("Loaded engine config from {:?}", self.path);
        Ok(config)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        let ext = self.path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        let content = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::to_string(config).context("Failed to serialize engine config")?,
            _ => serde_json::to_string_pretty(config).context("Failed to serialize engine config")?,
        };
        fs::write(&self.path, content).with_context(|| format!("Failed to write engine config {:?}", self.path))?;
        Ok(())
    }
}
