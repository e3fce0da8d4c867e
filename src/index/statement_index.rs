//! Statement Index
//!
//! In-memory store of validated statements with secondary lookups by actor,
//! document and time, plus brute-force similarity search over embeddings.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use super::similarity::cosine;
use super::Embedder;
use crate::error::{EngineError, Result};
use crate::model::{LegalCategory, Statement};

#[derive(Debug, Clone, Default)]
pub struct StatementIndex {
    statements: Vec<Statement>,
    positions: BTreeMap<String, usize>,
    by_actor: BTreeMap<String, Vec<usize>>,
    by_document: BTreeMap<String, Vec<usize>>,
}

impl StatementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement. Ids are unique within an index.
    pub fn add(&mut self, statement: Statement) -> Result<()> {
        if self.positions.contains_key(&statement.id) {
            return Err(EngineError::DuplicateStatement(statement.id));
        }

        let pos = self.statements.len();
        self.positions.insert(statement.id.clone(), pos);
        self.by_actor.entry(statement.actor.clone()).or_default().push(pos);
        self.by_document.entry(statement.document_id.clone()).or_default().push(pos);
        self.statements.push(statement);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Statement> {
        self.positions.get(id).map(|&pos| &self.statements[pos])
    }

    /// All statements in insertion order
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Actor keys with at least one statement, sorted
    pub fn actors(&self) -> Vec<String> {
        self.by_actor.keys().cloned().collect()
    }

    pub fn documents(&self) -> BTreeSet<String> {
        self.by_document.keys().cloned().collect()
    }

    pub fn by_actor(&self, actor: &str) -> Vec<&Statement> {
        self.lookup(self.by_actor.get(actor))
    }

    pub fn by_document(&self, document_id: &str) -> Vec<&Statement> {
        self.lookup(self.by_document.get(document_id))
    }

    /// Timestamped statements inside `[start, end]`. Untimed statements never match.
    pub fn by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Statement> {
        self.statements
            .iter()
            .filter(|s| s.timestamp.is_some_and(|t| t >= start && t <= end))
            .collect()
    }

    pub fn by_category(&self, category: LegalCategory) -> Vec<&Statement> {
        self.statements.iter().filter(|s| s.category == category).collect()
    }

    fn lookup(&self, positions: Option<&Vec<usize>>) -> Vec<&Statement> {
        positions
            .map(|p| p.iter().map(|&pos| &self.statements[pos]).collect())
            .unwrap_or_default()
    }

    /// Embed every statement that does not carry an embedding yet.
    /// Returns the number of statements embedded.
    pub fn assign_embeddings(&mut self, embedder: &dyn Embedder, parallel: bool) -> usize {
        let embed_one = |s: &mut Statement| {
            if s.embedding.is_some() {
                return 0;
            }
            let vector = embedder.embed(&s.text);
            usize::from(s.assign_embedding(vector))
        };

        let count = if parallel {
            self.statements.par_iter_mut().map(embed_one).sum::<usize>()
        } else {
            self.statements.iter_mut().map(embed_one).sum::<usize>()
        };

        info!("Embedded {} statements ({} dimensions)", count, embedder.dimensions());
        count
    }

    /// Statements whose cosine similarity with `statement` is at least
    /// `threshold`, best first. Ties keep index order. The query itself is
    /// never returned.
    pub fn find_similar(&self, statement: &Statement, threshold: f32, limit: usize) -> Vec<(&Statement, f32)> {
        let Some(query) = statement.embedding.as_deref() else {
            debug!("find_similar called for unembedded statement {}", statement.id);
            return Vec::new();
        };

        let mut scored: Vec<(&Statement, f32)> = self
            .statements
            .iter()
            .filter(|s| s.id != statement.id)
            .filter_map(|s| s.embedding.as_deref().map(|e| (s, cosine(query, e))))
            .filter(|(_, score)| *score >= threshold)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);
        scored
    }

    pub fn clear(&mut self) {
        self.statements.clear();
        self.positions.clear();
        self.by_actor.clear();
        self.by_document.clear();
    }
}
