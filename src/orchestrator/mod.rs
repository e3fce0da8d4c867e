//! Orchestrator Module
//!
//! Sequences one analysis run through a fixed stage order and owns every
//! structure the run derives.

pub mod pipeline;
pub mod report;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use pipeline::Orchestrator;
pub use report::{AnalysisInput, AnalysisReport, ReportSummary};

/// Stage the pipeline has completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Empty,
    Indexed,
    Embedded,
    Profiled,
    TimelineBuilt,
    Detected,
    Scored,
    Reported,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Indexed => "indexed",
            Self::Embedded => "embedded",
            Self::Profiled => "profiled",
            Self::TimelineBuilt => "timeline_built",
            Self::Detected => "detected",
            Self::Scored => "scored",
            Self::Reported => "reported",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
