//! Data Model
//!
//! Every entity here is created and dropped inside one orchestration run.

pub mod actor;
pub mod claim;
pub mod contradiction;
pub mod liability;
pub mod pattern;
pub mod profile;
pub mod statement;
pub mod timeline;

pub use actor::{normalize_name, Actor, ActorRegistry};
pub use claim::{Claim, ClaimCategory, FinancialFigure};
pub use contradiction::{Contradiction, ContradictionType, LegalTrigger, Severity};
pub use liability::{LiabilityEntry, LiabilityScores};
pub use pattern::{BehavioralPattern, PatternEvidence, PatternInstance, PatternKind, PatternSeverity};
pub use profile::{EntityProfile, TrendPoint};
pub use statement::{LegalCategory, RawStatement, SourceType, Statement, StatementRef};
pub use timeline::{EventType, TimelineEvent};
