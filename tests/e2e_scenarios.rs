use std::fs;

use truth_engine::config::ConfigLoader;
use truth_engine::index::{cosine, Embedder, HashedEmbedder};
use truth_engine::model::{LegalTrigger, PatternKind};
use truth_engine::{
    Actor, AnalysisInput, ContradictionType, EngineConfig, EngineError, LiabilityWeights, Orchestrator,
    PipelineStage, RawStatement, SimilarityThresholds, SourceType,
};

fn run(input: AnalysisInput) -> truth_engine::AnalysisReport {
    let mut engine = Orchestrator::new(EngineConfig::default()).unwrap();
    engine.run(input).unwrap().clone()
}

#[test]
fn test_negation_produces_direct_contradiction() {
    let report = run(AnalysisInput::new(vec![
        RawStatement::new("Alice", "I never signed the contract", "deposition").with_timestamp("2023-01-10 09:00"),
        RawStatement::new("Alice", "I signed the contract", "email-14").with_timestamp("2023-03-02 14:30"),
    ]));

    let direct: Vec<_> = report
        .contradictions
        .iter()
        .filter(|c| c.contradiction_type == ContradictionType::Direct)
        .collect();
    assert_eq!(direct.len(), 1);
    assert!(direct[0].severity.value() >= 6);
    assert_eq!(direct[0].affected_actors, vec!["alice".to_string()]);
    assert_eq!(direct[0].legal_trigger, Some(LegalTrigger::FalseStatement));
}

#[test]
fn test_topic_shift_follows_relatedness_threshold() {
    let a = "No deal ever existed";
    let b = "The deal fell through";
    let embedder = HashedEmbedder::default();
    let sim = cosine(&embedder.embed(a), &embedder.embed(b));

    let direct_count = |config: EngineConfig| {
        let mut engine = Orchestrator::new(config).unwrap();
        let report = engine
            .run(AnalysisInput::new(vec![
                RawStatement::new("Sam", a, "chat-1"),
                RawStatement::new("Sam", b, "chat-2"),
            ]))
            .unwrap();
        report
            .contradictions
            .iter()
            .filter(|c| c.contradiction_type == ContradictionType::Direct)
            .count()
    };

    // default thresholds: exactly one of the negations is present, so the
    // outcome is decided by relatedness alone
    let expected = usize::from(sim >= SimilarityThresholds::default().related);
    assert_eq!(direct_count(EngineConfig::default()), expected);

    // just above the pair's similarity: not related, nothing flagged
    let related = sim + 0.01;
    let above = EngineConfig::default().with_similarity(SimilarityThresholds {
        related,
        drift_upper: related + 0.05,
        strong: (related + 0.1).min(1.0),
    });
    assert_eq!(direct_count(above), 0);

    // just below: related with opposite polarity
    let related = (sim - 0.01).max(0.0);
    let below = EngineConfig::default().with_similarity(SimilarityThresholds {
        related,
        drift_upper: related + 0.05,
        strong: (related + 0.1).min(1.0),
    });
    assert_eq!(direct_count(below), 1);
}

#[test]
fn test_financial_drift_severity() {
    let report = run(AnalysisInput::new(vec![
        RawStatement::new("Hank", "I paid $1,000 for the car repairs", "receipt").with_timestamp("2023-01-05"),
        RawStatement::new("Hank", "I paid $1,600 for the car repairs", "affidavit").with_timestamp("2023-06-20"),
    ]));

    let financial: Vec<_> = report
        .contradictions
        .iter()
        .filter(|c| c.contradiction_type == ContradictionType::Financial)
        .collect();
    assert_eq!(financial.len(), 1);
    assert_eq!(financial[0].severity.value(), 9);
    assert_eq!(financial[0].legal_trigger, Some(LegalTrigger::FinancialMisrepresentation));
}

#[test]
fn test_aliases_merge_into_one_profile() {
    let input = AnalysisInput::new(vec![
        RawStatement::new("John Smith", "I transferred the deposit", "email"),
        RawStatement::new("J. Smith", "The keys were returned on time", "chat"),
    ])
    .with_actor(Actor::new("John Smith").with_alias("J. Smith"));

    let report = run(input);
    assert_eq!(report.profiles.len(), 1);
    let profile = &report.profiles["john smith"];
    assert_eq!(profile.statement_count(), 2);
    assert!(report.statements.iter().all(|s| s.actor == "john smith"));
    assert_eq!(report.liability.len(), 1);
}

#[test]
fn test_empty_input_reaches_reported() {
    let mut engine = Orchestrator::new(EngineConfig::default()).unwrap();
    let report = engine.run(AnalysisInput::default()).unwrap();
    assert!(report.statements.is_empty());
    assert!(report.timeline.is_empty());
    assert!(report.profiles.is_empty());
    assert!(report.contradictions.is_empty());
    assert!(report.behavioral_patterns.is_empty());
    assert!(report.liability.is_empty());
    assert_eq!(report.summary.highest_severity, None);
    assert_eq!(engine.stage(), PipelineStage::Reported);
}

#[test]
fn test_malformed_input_is_rejected_not_dropped() {
    let mut engine = Orchestrator::new(EngineConfig::default()).unwrap();
    let err = engine
        .run(AnalysisInput::new(vec![
            RawStatement::new("Alice", "valid", "d"),
            RawStatement::new("   ", "orphan text", "d"),
        ]))
        .unwrap_err();
    match err {
        EngineError::InvalidStatements { count, details } => {
            assert_eq!(count, 1);
            assert!(details[0].contains("#1"));
        }
        other => panic!("unexpected error {}", other),
    }
    assert_eq!(engine.stage(), PipelineStage::Empty);
}

#[test]
fn test_behavioral_patterns_reach_profiles() {
    let report = run(AnalysisInput::new(vec![
        RawStatement::new("Rick", "Trust me, it was fine", "chat").with_timestamp("2023-01-01"),
        RawStatement::new("Rick", "It's your fault the payment bounced", "chat").with_timestamp("2023-02-15"),
    ]));

    let kinds = &report.profiles["rick"].patterns;
    assert!(kinds.contains(&PatternKind::OverExplaining));
    assert!(kinds.contains(&PatternKind::BlameShifting));
    assert!(kinds.contains(&PatternKind::Ghosting));
    assert!(report.liability["rick"].behavioral_score > 0.0);
}

#[test]
fn test_weight_preset_changes_totals_only() {
    let input = AnalysisInput::new(vec![
        RawStatement::new("Alice", "I never signed the contract", "d1").with_source(SourceType::Email),
        RawStatement::new("Alice", "I signed the contract", "d2").with_source(SourceType::Chat),
        RawStatement::new("Alice", "Trust me on this", "d3"),
    ]);

    let mut standard = Orchestrator::new(EngineConfig::default()).unwrap();
    let a = standard.run(input.clone()).unwrap().clone();
    let mut weighted =
        Orchestrator::new(EngineConfig::default().with_liability_weights(LiabilityWeights::behavior_weighted())).unwrap();
    let b = weighted.run(input).unwrap().clone();

    assert_eq!(a.contradictions, b.contradictions);
    assert_eq!(a.behavioral_patterns, b.behavioral_patterns);
    assert_eq!(a.liability["alice"].contradiction_score, b.liability["alice"].contradiction_score);
    assert_ne!(a.liability["alice"].total, b.liability["alice"].total);
}

#[test]
fn test_config_file_drives_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.yaml");
    fs::write(&path, "similarity:\n  related: 0.99\n  drift_upper: 0.995\n  strong: 1.0\nparallel: false\n").unwrap();

    let config = ConfigLoader::new(&path).load().unwrap();
    assert!(!config.parallel);

    let mut engine = Orchestrator::new(config).unwrap();
    let report = engine
        .run(AnalysisInput::new(vec![
            RawStatement::new("Alice", "I never signed the lease agreement", "d1"),
            RawStatement::new("Alice", "I signed it but only the first page of the lease", "d2"),
        ]))
        .unwrap();
    assert!(report
        .contradictions
        .iter()
        .all(|c| c.contradiction_type != ContradictionType::Direct));
}
