//! Pipeline
//!
//! `Empty → Indexed → Embedded → Profiled → TimelineBuilt → Detected →
//! Scored → Reported`. Each stage method checks that the previous stage is
//! complete and fails with `EngineError::StageOrder` otherwise. `reset`
//! drops everything and returns to `Empty`.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::report::{AnalysisInput, AnalysisReport, ReportSummary};
use super::PipelineStage;
use crate::analysis::{BehavioralPatternDetector, EntityProfileBuilder, LiabilityScorer, TimelineBuilder};
use crate::config::EngineConfig;
use crate::detectors::{default_detectors, run_all, ContradictionDetector, DetectionContext};
use crate::error::{EngineError, Result};
use crate::index::{Embedder, HashedEmbedder, StatementIndex};
use crate::model::{
    Actor, ActorRegistry, BehavioralPattern, Contradiction, EntityProfile, LiabilityEntry, RawStatement, Statement,
    TimelineEvent,
};

pub struct Orchestrator {
    config: EngineConfig,
    embedder: Box<dyn Embedder>,
    detectors: Vec<Box<dyn ContradictionDetector>>,
    stage: PipelineStage,
    registry: ActorRegistry,
    index: StatementIndex,
    profiles: BTreeMap<String, EntityProfile>,
    timeline: Vec<TimelineEvent>,
    contradictions: Vec<Contradiction>,
    patterns: Vec<BehavioralPattern>,
    liability: BTreeMap<String, LiabilityEntry>,
    report: Option<AnalysisReport>,
}

impl Orchestrator {
    /// Validates `config` and sets up the hashed embedder it describes
    pub fn new(config: EngineConfig) -> Result<Self> {
        let embedder = Box::new(HashedEmbedder::new(&config.embedding));
        Self::with_embedder(config, embedder)
    }

    /// Use a caller-supplied embedder instead of the hashed one
    pub fn with_embedder(config: EngineConfig, embedder: Box<dyn Embedder>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            embedder,
            detectors: default_detectors(),
            stage: PipelineStage::Empty,
            registry: ActorRegistry::new(),
            index: StatementIndex::new(),
            profiles: BTreeMap::new(),
            timeline: Vec::new(),
            contradictions: Vec::new(),
            patterns: Vec::new(),
            liability: BTreeMap::new(),
            report: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    fn require(&self, operation: &'static str, required: PipelineStage) -> Result<()> {
        if self.stage != required {
            return Err(EngineError::StageOrder { operation, required, actual: self.stage });
        }
        Ok(())
    }

    fn require_at_least(&self, operation: &'static str, required: PipelineStage) -> Result<()> {
        if self.stage < required {
            return Err(EngineError::StageOrder { operation, required, actual: self.stage });
        }
        Ok(())
    }

    /// Register identity hints before ingestion
    pub fn register_actor(&mut self, actor: Actor) -> Result<String> {
        self.require("register_actor", PipelineStage::Empty)?;
        Ok(self.registry.register(actor))
    }

    /// Validate and index a batch. Any malformed entry rejects the whole
    /// batch and leaves the pipeline untouched.
    pub fn ingest(&mut self, raw: Vec<RawStatement>) -> Result<()> {
        self.require("ingest", PipelineStage::Empty)?;

        let details: Vec<String> = raw
            .iter()
            .enumerate()
            .filter_map(|(i, r)| {
                let problems = r.problems();
                (!problems.is_empty()).then(|| format!("statement #{}: {}", i, problems.join(", ")))
            })
            .collect();
        if !details.is_empty() {
            warn!("Rejected batch of {} statements: {} invalid", raw.len(), details.len());
            return Err(EngineError::InvalidStatements { count: details.len(), details });
        }

        // Resolve into a copy so a failed batch leaves no discovered actors behind
        let mut registry = self.registry.clone();
        let mut seen: BTreeMap<(String, String, String, Option<String>), usize> = BTreeMap::new();
        let mut statements = Vec::with_capacity(raw.len());
        for r in raw {
            let key = registry.resolve(&r.actor);
            let identity = (
                key.clone(),
                r.text.trim().to_string(),
                r.document_id.trim().to_string(),
                r.timestamp.clone().filter(|t| !t.trim().is_empty()),
            );
            let ordinal = seen.entry(identity).or_insert(0);
            let statement = Statement::from_raw(r, &key, *ordinal);
            *ordinal += 1;

            if let (None, Some(raw_ts)) = (statement.timestamp, statement.timestamp_raw.as_deref()) {
                warn!("Unparseable timestamp '{}' on statement {}; kept as text", raw_ts, statement.id);
            }
            statements.push(statement);
        }

        // Canonical order: dated statements by time, undated last, then id
        statements.sort_by(|a, b| {
            a.timestamp
                .is_none()
                .cmp(&b.timestamp.is_none())
                .then_with(|| a.timestamp.cmp(&b.timestamp))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut index = StatementIndex::new();
        for statement in statements {
            index.add(statement)?;
        }
        self.registry = registry;
        self.index = index;

        info!("Indexed {} statements from {} actors", self.index.len(), self.index.actors().len());
        self.stage = PipelineStage::Indexed;
        Ok(())
    }

    pub fn embed(&mut self) -> Result<()> {
        self.require("embed", PipelineStage::Indexed)?;
        self.index.assign_embeddings(self.embedder.as_ref(), self.config.parallel);
        self.stage = PipelineStage::Embedded;
        Ok(())
    }

    pub fn build_profiles(&mut self) -> Result<()> {
        self.require("build_profiles", PipelineStage::Embedded)?;
        self.profiles = EntityProfileBuilder::new(self.config.parallel).build(&self.index, &self.registry);
        self.stage = PipelineStage::Profiled;
        Ok(())
    }

    pub fn build_timeline(&mut self) -> Result<()> {
        self.require("build_timeline", PipelineStage::Profiled)?;
        self.timeline = TimelineBuilder::new().build(&self.index);
        self.stage = PipelineStage::TimelineBuilt;
        Ok(())
    }

    /// Contradiction passes followed by the behavioral pass
    pub fn detect(&mut self) -> Result<()> {
        self.require("detect", PipelineStage::TimelineBuilt)?;

        let ctx = DetectionContext::new(&self.index, &self.profiles, &self.timeline, &self.config);
        let contradictions = run_all(&self.detectors, &ctx)?;
        let patterns = BehavioralPatternDetector::new(self.config.behavior).detect(&self.index, &self.timeline);

        self.contradictions = contradictions;
        self.patterns = patterns;
        self.stage = PipelineStage::Detected;
        Ok(())
    }

    pub fn score(&mut self) -> Result<()> {
        self.require("score", PipelineStage::Detected)?;
        self.liability = LiabilityScorer::new(self.config.liability).score(
            &self.index,
            &self.contradictions,
            &self.patterns,
            &self.timeline,
        );
        self.stage = PipelineStage::Scored;
        Ok(())
    }

    /// Assemble the report. Profiles are annotated with the pattern kinds
    /// found for their actor.
    pub fn finalize(&mut self) -> Result<&AnalysisReport> {
        self.require("finalize", PipelineStage::Scored)?;

        let mut profiles = self.profiles.clone();
        for pattern in &self.patterns {
            if let Some(profile) = profiles.get_mut(&pattern.actor) {
                profile.patterns.insert(pattern.kind);
            }
        }

        let statements = self.index.statements().to_vec();
        let summary = ReportSummary::compute(
            &statements,
            &profiles,
            &self.timeline,
            &self.contradictions,
            &self.patterns,
            &self.liability,
        );
        debug!("Report summary: {:?}", summary);

        self.stage = PipelineStage::Reported;
        Ok(&*self.report.insert(AnalysisReport {
            statements,
            timeline: self.timeline.clone(),
            profiles,
            contradictions: self.contradictions.clone(),
            behavioral_patterns: self.patterns.clone(),
            liability: self.liability.clone(),
            summary,
        }))
    }

    /// The finished report; only available once the run is `Reported`
    pub fn report(&self) -> Result<&AnalysisReport> {
        self.require("report", PipelineStage::Reported)?;
        self.report.as_ref().ok_or(EngineError::StageOrder {
            operation: "report",
            required: PipelineStage::Reported,
            actual: self.stage,
        })
    }

    /// Full run from `Empty` to `Reported`
    pub fn run(&mut self, input: AnalysisInput) -> Result<&AnalysisReport> {
        self.require("run", PipelineStage::Empty)?;
        info!("Starting analysis of {} statements", input.statements.len());

        let registered = self.registry.clone();
        for actor in input.actors {
            self.registry.register(actor);
        }
        if let Err(err) = self.ingest(input.statements) {
            self.registry = registered;
            return Err(err);
        }
        self.embed()?;
        self.build_profiles()?;
        self.build_timeline()?;
        self.detect()?;
        self.score()?;
        self.finalize()
    }

    /// Indexed statements most similar to `statement_id`, best first
    pub fn find_similar(&self, statement_id: &str, threshold: f32, limit: usize) -> Result<Vec<(&Statement, f32)>> {
        self.require_at_least("find_similar", PipelineStage::Embedded)?;
        let statement = self
            .index
            .get(statement_id)
            .ok_or_else(|| EngineError::UnknownStatement(statement_id.to_string()))?;
        Ok(self.index.find_similar(statement, threshold, limit))
    }

    pub fn index(&self) -> &StatementIndex {
        &self.index
    }

    pub fn profiles(&self) -> &BTreeMap<String, EntityProfile> {
        &self.profiles
    }

    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    pub fn contradictions(&self) -> &[Contradiction] {
        &self.contradictions
    }

    pub fn patterns(&self) -> &[BehavioralPattern] {
        &self.patterns
    }

    pub fn liability(&self) -> &BTreeMap<String, LiabilityEntry> {
        &self.liability
    }

    /// Drop every derived structure and registered actor; back to `Empty`
    pub fn reset(&mut self) {
        self.registry.clear();
        self.index.clear();
        self.profiles.clear();
        self.timeline.clear();
        self.contradictions.clear();
        self.patterns.clear();
        self.liability.clear();
        self.report = None;
        self.stage = PipelineStage::Empty;
        debug!("Orchestrator reset");
    }
}
