//! Contradiction Detectors
//!
//! Five passes behind one trait. Each pass is a pure function of the
//! read-only `DetectionContext`; `run_all` concatenates them in fixed order
//! and stable-sorts by severity so equal severities keep pass order.

pub mod cross_entity;
pub mod direct;
pub mod entity;
pub mod semantic;
pub mod timeline;

use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::index::{Similarity, StatementIndex};
use crate::model::{Contradiction, EntityProfile, Statement, StatementRef, TimelineEvent};

pub use cross_entity::CrossEntityDetector;
pub use direct::DirectDetector;
pub use entity::EntityDetector;
pub use semantic::SemanticDetector;
pub use timeline::TimelineDetector;

/// Read-only snapshot every pass works from
pub struct DetectionContext<'a> {
    pub index: &'a StatementIndex,
    pub profiles: &'a BTreeMap<String, EntityProfile>,
    pub timeline: &'a [TimelineEvent],
    pub config: &'a EngineConfig,
    pub similarity: Similarity,
}

impl<'a> DetectionContext<'a> {
    pub fn new(
        index: &'a StatementIndex,
        profiles: &'a BTreeMap<String, EntityProfile>,
        timeline: &'a [TimelineEvent],
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            index,
            profiles,
            timeline,
            config,
            similarity: Similarity::new(config.similarity),
        }
    }

    /// Snapshot of an indexed statement
    pub fn statement_ref(&self, id: &str) -> Result<StatementRef> {
        self.index
            .get(id)
            .map(Statement::to_ref)
            .ok_or_else(|| EngineError::UnknownStatement(id.to_string()))
    }

    /// Every unordered pair of statements by the same actor, actors in key
    /// order and statements in index order
    pub fn same_actor_pairs(&self) -> Vec<(&'a Statement, &'a Statement)> {
        let mut pairs = Vec::new();
        for actor in self.index.actors() {
            let statements = self.index.by_actor(&actor);
            for (i, a) in statements.iter().enumerate() {
                for b in &statements[i + 1..] {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }

    /// Evaluate `check` over `items`, on the rayon pool when configured.
    /// Output order follows input order either way.
    pub fn evaluate<T, F>(&self, items: &[T], check: F) -> Result<Vec<Contradiction>>
    where
        T: Sync,
        F: Fn(&T) -> Result<Option<Contradiction>> + Sync + Send,
    {
        let results: Vec<Option<Contradiction>> = if self.config.parallel {
            items.par_iter().map(&check).collect::<Result<Vec<_>>>()?
        } else {
            items.iter().map(&check).collect::<Result<Vec<_>>>()?
        };
        Ok(results.into_iter().flatten().collect())
    }
}

/// One contradiction-detection pass
pub trait ContradictionDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Must return an empty list, not an error, when there is too little data
    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>>;
}

/// The five passes in reporting order
pub fn default_detectors() -> Vec<Box<dyn ContradictionDetector>> {
    vec![
        Box::new(DirectDetector),
        Box::new(SemanticDetector),
        Box::new(TimelineDetector),
        Box::new(EntityDetector),
        Box::new(CrossEntityDetector),
    ]
}

/// Run `detectors` in order and sort the union by severity, highest first
pub fn run_all(detectors: &[Box<dyn ContradictionDetector>], ctx: &DetectionContext<'_>) -> Result<Vec<Contradiction>> {
    let mut all = Vec::new();
    for detector in detectors {
        let found = detector.detect(ctx)?;
        debug!("{} pass produced {} contradictions", detector.name(), found.len());
        all.extend(found);
    }

    all.sort_by(|a, b| b.severity.cmp(&a.severity));
    info!("Detected {} contradictions", all.len());
    Ok(all)
}
