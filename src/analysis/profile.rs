//! Entity Profile Builder
//!
//! Folds each actor's statements into claims, financial figures, a dated
//! footprint and sentiment/certainty trends.

use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

use super::financial::extract_figures;
use crate::index::StatementIndex;
use crate::model::{ActorRegistry, Claim, EntityProfile, TrendPoint};

#[derive(Debug, Clone, Default)]
pub struct EntityProfileBuilder {
    parallel: bool,
}

impl EntityProfileBuilder {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// One profile per actor with at least one statement, keyed by actor key
    pub fn build(&self, index: &StatementIndex, registry: &ActorRegistry) -> BTreeMap<String, EntityProfile> {
        let actors = index.actors();
        let build_one = |actor: &String| (actor.clone(), Self::profile_for(actor, index, registry));

        let profiles: BTreeMap<String, EntityProfile> = if self.parallel {
            actors.par_iter().map(build_one).collect::<Vec<_>>().into_iter().collect()
        } else {
            actors.iter().map(build_one).collect()
        };

        info!("Built {} entity profiles", profiles.len());
        profiles
    }

    fn profile_for(actor: &str, index: &StatementIndex, registry: &ActorRegistry) -> EntityProfile {
        let mut profile = EntityProfile::new(actor, registry.display_name(actor));
        profile.aliases = registry.spellings(actor);

        for statement in index.by_actor(actor) {
            profile.statement_ids.push(statement.id.clone());
            profile.claims.push(Claim::from_statement(statement));
            profile.financial_figures.extend(extract_figures(statement));

            if let Some(ts) = statement.timestamp {
                profile.timeline_footprint.push(ts);
            }
            profile.sentiment_trend.push(TrendPoint {
                statement_id: statement.id.clone(),
                timestamp: statement.timestamp,
                value: statement.sentiment,
            });
            profile.certainty_trend.push(TrendPoint {
                statement_id: statement.id.clone(),
                timestamp: statement.timestamp,
                value: statement.certainty,
            });
        }

        profile.timeline_footprint.sort();
        profile
    }
}
