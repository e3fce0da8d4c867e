use truth_engine::{
    Actor, AnalysisInput, EngineConfig, Orchestrator, PipelineStage, RawStatement, SourceType,
};

fn corpus() -> AnalysisInput {
    AnalysisInput::new(vec![
        RawStatement::new("Alice Moore", "I never signed the contract", "deposition")
            .with_timestamp("2023-01-10 09:00")
            .with_source(SourceType::Transcript),
        RawStatement::new("alice moore", "I signed the contract", "email-14")
            .with_timestamp("2023-01-10 15:00")
            .with_source(SourceType::Email),
        RawStatement::new("Alice", "I paid $1,000 for the car repairs", "receipt")
            .with_timestamp("2023-02-01")
            .with_source(SourceType::Document),
        RawStatement::new("Alice Moore", "I paid $1,600 for the car repairs", "affidavit")
            .with_timestamp("2023-05-01")
            .with_source(SourceType::Document),
        RawStatement::new("Bob", "That is not true, she never paid for the car repairs", "chat-3")
            .with_timestamp("2023-05-02 10:00")
            .with_source(SourceType::Chat),
        RawStatement::new("Bob", "Trust me, honestly, I requested the invoice", "chat-3")
            .with_timestamp("2023-05-02 10:02")
            .with_source(SourceType::Chat),
        RawStatement::new("Bob", "Watching football at home all evening", "call-log")
            .with_timestamp("2023-05-02 10:04")
            .with_source(SourceType::Audio),
        RawStatement::new("Bob", "It's your fault the deal collapsed", "chat-3")
            .with_timestamp("2023-07-30")
            .with_source(SourceType::Chat),
        RawStatement::new("Carol", "The meeting about the car repairs happened at the garage", "diary")
            .with_timestamp("2023-02-01"),
        RawStatement::new("Carol", "Meeting about the car repairs at the garage", "email-20")
            .with_timestamp("2023-06-01"),
        RawStatement::new("Carol", "Some undated remark about the weather", "notes")
            .with_timestamp("sometime in spring"),
        RawStatement::new("Carol", "Some undated remark about the weather", "notes")
            .with_timestamp("sometime in spring"),
    ])
    .with_actor(Actor::new("Alice Moore").with_alias("Alice"))
}

fn report_json(input: AnalysisInput, config: EngineConfig) -> String {
    let mut engine = Orchestrator::new(config).unwrap();
    engine.run(input).unwrap().to_json().unwrap()
}

#[test]
fn test_identical_input_identical_report() {
    let first = report_json(corpus(), EngineConfig::default());
    let second = report_json(corpus(), EngineConfig::default());
    assert_eq!(first, second);
}

#[test]
fn test_input_order_does_not_matter() {
    let baseline = report_json(corpus(), EngineConfig::default());

    let mut reversed = corpus();
    reversed.statements.reverse();
    assert_eq!(report_json(reversed, EngineConfig::default()), baseline);

    let mut rotated = corpus();
    rotated.statements.rotate_left(5);
    assert_eq!(report_json(rotated, EngineConfig::default()), baseline);
}

#[test]
fn test_parallel_and_sequential_runs_agree() {
    assert_eq!(
        report_json(corpus(), EngineConfig::default()),
        report_json(corpus(), EngineConfig::default().sequential())
    );
}

#[test]
fn test_severity_and_liability_bounds() {
    let mut engine = Orchestrator::new(EngineConfig::default()).unwrap();
    let report = engine.run(corpus()).unwrap();

    assert!(!report.contradictions.is_empty());
    for c in &report.contradictions {
        assert!((1..=10).contains(&c.severity.value()));
        assert!((0.0..=1.0).contains(&c.confidence));
    }
    assert!(report.contradictions.windows(2).all(|w| w[0].severity >= w[1].severity));

    for entry in report.liability.values() {
        assert!((0.0..=100.0).contains(&entry.total));
        for score in [
            entry.contradiction_score,
            entry.behavioral_score,
            entry.evidence_score,
            entry.consistency_score,
            entry.causal_score,
        ] {
            assert!((0.0..=1.0).contains(&score));
        }
    }
}

#[test]
fn test_reset_then_rerun_reproduces_report() {
    let mut engine = Orchestrator::new(EngineConfig::default()).unwrap();
    let first = engine.run(corpus()).unwrap().to_json().unwrap();

    engine.reset();
    assert_eq!(engine.stage(), PipelineStage::Empty);
    assert!(engine.profiles().is_empty());
    assert!(engine.timeline().is_empty());
    assert!(engine.liability().is_empty());

    let second = engine.run(corpus()).unwrap().to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_timeline_and_summary_consistency() {
    let mut engine = Orchestrator::new(EngineConfig::default()).unwrap();
    let report = engine.run(corpus()).unwrap();

    // the two undated duplicates stay off the timeline but are both indexed
    assert_eq!(report.statements.len(), 12);
    assert_eq!(report.timeline.len(), 10);
    assert!(report.timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    assert_eq!(report.summary.statement_count, 12);
    assert_eq!(report.summary.actor_count, 3);
    assert_eq!(report.summary.contradiction_count, report.contradictions.len());
    assert_eq!(
        report.summary.highest_severity,
        report.contradictions.first().map(|c| c.severity)
    );
    let by_type: usize = report.summary.contradictions_by_type.values().sum();
    assert_eq!(by_type, report.contradictions.len());
    assert!(report.summary.top_liability_actor.is_some());

    // every alias spelling landed on the registered actor
    assert_eq!(report.profiles["alice moore"].statement_count(), 4);
}
