use chrono::NaiveDate;
use serde_json::{Value, json};
use taskrank_core::scoring::urgency_raw;
use taskrank_core::{
    AnalysisError, RunResult, Strategy, Tier, Weights, analyze_payload, analyze_records,
    detect_cycles, normalize,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn run(raw: &[Value]) -> RunResult {
    analyze_records(raw, Strategy::SmartBalance, None, today())
}

fn task<'a>(r: &'a RunResult, id: &str) -> &'a taskrank_core::AnalyzedTask {
    r.analyzed_tasks
        .iter()
        .find(|t| t.id == id)
        .unwrap_or_else(|| panic!("task {id} missing"))
}

#[test]
fn test_past_due_task_is_capped_and_ranked() {
    let raw = vec![
        json!({"id": "a", "title": "old", "due_date": "2000-01-01", "importance": 5, "estimated_hours": 2, "dependencies": []}),
        json!({"id": "b", "title": "future", "due_date": "2099-01-01", "importance": 10, "estimated_hours": 1, "dependencies": []}),
    ];
    let r = run(&raw);

    let a = task(&r, "a");
    let b = task(&r, "b");
    assert!(a.score > 0.0);
    assert!(b.score > 0.0);
    assert_eq!(a.score_breakdown.urgency, 1.0);
    assert!(matches!(a.tier, Tier::High | Tier::Medium));
    assert!(a.explanation.starts_with("Past due by"));
    assert_eq!(a.due_date, json!("2000-01-01"));
}

#[test]
fn test_overdue_boost_caps_before_blend() {
    let long_ago = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    assert_eq!(urgency_raw(Some(long_ago), today()), 2.0);

    let raw = vec![json!({"id": "a", "due_date": "2025-01-01"})];
    let r = analyze_records(&raw, Strategy::DeadlineDriven, None, today());
    let t = &r.analyzed_tasks[0];
    let w = t.score_breakdown.weights;
    // urgency contributes at most its weight
    let expected = w.urgency * 1.0 + w.importance * 0.5 + w.effort * 0.5;
    assert!((t.score - expected).abs() < 1e-4);
}

#[test]
fn test_mutual_dependency_is_one_cycle() {
    let raw = vec![
        json!({"id": "t1", "dependencies": ["t2"]}),
        json!({"id": "t2", "dependencies": ["t1"]}),
        json!({"id": "t3", "dependencies": []}),
    ];
    let cycles = detect_cycles(&normalize(&raw).tasks);
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].tasks.iter().any(|id| id == "t1"));
    assert!(cycles[0].tasks.iter().any(|id| id == "t2"));

    let r = run(&raw);
    assert_eq!(r.meta.cycles.len(), 1);
    assert_eq!(r.meta.cycles[0].message, "circular dependency detected");
    assert_eq!(
        task(&r, "t1").warnings,
        ["Task is part of a circular dependency (cycle #1)."]
    );
    assert!(task(&r, "t3").warnings.is_empty());
}

#[test]
fn test_missing_fields_default() {
    let r = run(&[json!({"id": "x"})]);
    let t = &r.analyzed_tasks[0];
    assert_eq!(t.importance, 5);
    assert_eq!(t.estimated_hours, 2.0);
    assert!(t.dependencies.is_empty());
    assert_eq!(t.due_date, Value::Null);
    assert!(t.warnings.is_empty());
    assert_eq!(t.explanation, "No due date; Quick win (low estimated hours)");
    // 0.30 * 0.5 + 0.15 * 0.5
    assert_eq!(t.score, 0.225);
    assert_eq!(t.tier, Tier::Low);
    assert!(r.meta.warnings_summary.is_none());
}

#[test]
fn test_partial_custom_weights_zero_out_missing_factors() {
    let custom = Weights::from_value(&json!({"urgency": 2, "importance": 2}));
    let raw = vec![
        json!({"id": "root", "importance": 4, "estimated_hours": 0.5}),
        json!({"id": "dep", "importance": 4, "estimated_hours": 30, "dependencies": ["root"]}),
    ];
    let r = analyze_records(&raw, Strategy::FastestWins, custom, today());

    for t in &r.analyzed_tasks {
        let w = t.score_breakdown.weights;
        assert_eq!(w, Weights::new(0.5, 0.5, 0.0, 0.0));
        assert_eq!(t.score, 0.2);
    }
    // effort and dependencies still reported, just not weighted
    assert_eq!(task(&r, "root").score_breakdown.effort, 1.0);
    assert_eq!(task(&r, "root").score_breakdown.dependencies, 1.0);
}

#[test]
fn test_unknown_strategy_uses_smart_balance() {
    let raw = vec![json!({"id": "a"})];
    let r = analyze_records(&raw, Strategy::from_name("chaos"), None, today());
    assert_eq!(r.meta.strategy_used, Strategy::SmartBalance);
    assert_eq!(
        r.analyzed_tasks[0].score_breakdown.weights,
        Weights::new(0.35, 0.3, 0.2, 0.15)
    );
}

#[test]
fn test_malformed_batch_is_warned_not_rejected() {
    let raw = vec![
        json!({"id": "a", "importance": "urgent!", "estimated_hours": -4, "dependencies": "b,zzz"}),
        json!({"id": "b", "importance": 12.7, "estimated_hours": "1.5", "due_date": "tomorrow"}),
    ];
    let r = run(&raw);

    assert_eq!(
        task(&r, "a").warnings,
        [
            "importance value 'urgent!' is invalid and defaulted to 5",
            "estimated_hours '-4' was negative and set to 2.0",
            "dependencies value was a string and coerced to list: ['b', 'zzz']",
            "dependency 'zzz' not found in provided tasks",
        ]
    );
    assert_eq!(task(&r, "b").warnings, ["importance value '12.7' normalized to 10"]);
    assert_eq!(task(&r, "b").estimated_hours, 1.5);

    let summary = r.meta.warnings_summary.as_ref().unwrap();
    let ids: Vec<_> = summary.iter().map(|e| e.task_id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[test]
fn test_payload_envelope_and_rejection() {
    let payload = json!({"tasks": [{"id": "a"}, {"id": "b"}]});
    let r = analyze_payload(&payload, Strategy::SmartBalance, None, today()).unwrap();
    assert_eq!(r.analyzed_tasks.len(), 2);

    let err =
        analyze_payload(&json!({"id": "a"}), Strategy::SmartBalance, None, today()).unwrap_err();
    assert_eq!(err, AnalysisError::NotASequence { found: "object" });
}

#[test]
fn test_empty_batch() {
    let r = run(&[]);
    assert!(r.analyzed_tasks.is_empty());
    assert!(r.meta.cycles.is_empty());
    assert!(r.meta.warnings_summary.is_none());
}

#[test]
fn test_repeat_runs_are_identical() {
    let raw = vec![
        json!({"id": "a", "dependencies": ["b"], "due_date": "2026-03-04"}),
        json!({"id": "b", "dependencies": ["a"], "importance": "x"}),
        json!({"id": "c", "estimated_hours": 9}),
    ];
    let first = serde_json::to_string(&run(&raw)).unwrap();
    let second = serde_json::to_string(&run(&raw)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_wire_shape() {
    let raw = vec![json!({"id": "a", "estimated_hours": "bad"})];
    let v = serde_json::to_value(run(&raw)).unwrap();

    let t = &v["analyzed_tasks"][0];
    assert_eq!(t["tier"], json!("Low"));
    assert!(t["score_breakdown"]["weights"]["urgency"].is_number());
    assert_eq!(v["meta"]["strategy_used"], json!("smart_balance"));
    assert_eq!(v["meta"]["cycles"], json!([]));
    assert_eq!(v["meta"]["warnings_summary"][0]["task_id"], json!("a"));
}
