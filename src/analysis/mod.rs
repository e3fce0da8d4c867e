//! Analysis Module
//!
//! Builders that turn the indexed statements into per-actor profiles and a
//! dated timeline, plus the behavioral pass and the liability scorer that
//! run once contradictions are known.

pub mod behavior;
pub mod financial;
pub mod liability;
pub mod profile;
pub mod timeline;

pub use behavior::BehavioralPatternDetector;
pub use financial::{extract_figures, figure_context};
pub use liability::LiabilityScorer;
pub use profile::EntityProfileBuilder;
pub use timeline::TimelineBuilder;
