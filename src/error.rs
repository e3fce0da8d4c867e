//! Engine Errors
//!
//! A single error type for every fallible library operation. The driver
//! binary and the config loader wrap these in `anyhow` with context.

use thiserror::Error;

use crate::orchestrator::PipelineStage;

/// Errors raised by the truth engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Ingestion validation failed; `details` names every offending entry
    #[error("{count} statement(s) rejected: {}", .details.join("; "))]
    InvalidStatements { count: usize, details: Vec<String> },

    #[error("duplicate statement id {0}")]
    DuplicateStatement(String),

    #[error("severity {0} is outside the 1..=10 range")]
    SeverityOutOfRange(i64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A pipeline stage was invoked before its prerequisite completed
    #[error("{operation} requires stage {required}, but the pipeline is at {actual}")]
    StageOrder {
        operation: &'static str,
        required: PipelineStage,
        actual: PipelineStage,
    },

    #[error("unknown statement id {0}")]
    UnknownStatement(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
