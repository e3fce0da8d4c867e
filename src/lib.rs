//! Truth Engine
//!
//! Deterministic analysis of statements attributed to actors:
//! - Hashed bag-of-words embeddings and similarity search
//! - Five contradiction passes (direct, semantic, timeline, entity, cross-entity)
//! - Entity profiles and a reconstructed timeline
//! - Behavioral red-flag detection
//! - Weighted per-actor liability scoring
//!
//! Everything runs offline and in memory. An `Orchestrator` owns one run
//! from raw statements to an `AnalysisReport`.

pub mod analysis;
pub mod config;
pub mod detectors;
pub mod error;
pub mod index;
pub mod model;
pub mod orchestrator;
pub mod utils;

// Re-exports for convenience
pub use config::{ConfigLoader, EngineConfig, LiabilityWeights, SimilarityThresholds};
pub use error::{EngineError, Result};
pub use index::{Embedder, HashedEmbedder, StatementIndex};
pub use model::{Actor, Contradiction, ContradictionType, RawStatement, Severity, SourceType, Statement};
pub use orchestrator::{AnalysisInput, AnalysisReport, Orchestrator, PipelineStage};
