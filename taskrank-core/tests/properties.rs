use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use serde_json::{Value, json};
use taskrank_core::{DependencyGraph, Strategy as RankStrategy, analyze_records, normalize};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn batch() -> impl Strategy<Value = Vec<Value>> {
    let spec = (
        1i64..=10,
        0.0f64..40.0,
        prop::option::of(-60i64..90),
        prop::collection::vec(0usize..16, 0..4),
    );
    prop::collection::vec(spec, 0..12).prop_map(|specs| {
        let n = specs.len().max(1);
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (importance, hours, due, deps))| {
                let due = due.map(|d| (today() + Duration::days(d)).format("%Y-%m-%d").to_string());
                let deps: Vec<String> = deps.iter().map(|d| format!("t{}", d % n + 1)).collect();
                json!({
                    "id": format!("t{}", i + 1),
                    "importance": importance,
                    "estimated_hours": hours,
                    "due_date": due,
                    "dependencies": deps,
                })
            })
            .collect()
    })
}

fn strategy() -> impl Strategy<Value = RankStrategy> {
    prop::sample::select(RankStrategy::ALL.to_vec())
}

proptest! {
    #[test]
    fn output_is_sorted_by_score_importance_hours(raw in batch(), s in strategy()) {
        let r = analyze_records(&raw, s, None, today());
        for w in r.analyzed_tasks.windows(2) {
            let (a, b) = (&w[0], &w[1]);
            let ordered = a.score > b.score
                || (a.score == b.score
                    && (a.importance > b.importance
                        || (a.importance == b.importance && a.estimated_hours <= b.estimated_hours)));
            prop_assert!(ordered, "{} before {}", a.id, b.id);
        }
    }

    #[test]
    fn sub_scores_stay_in_unit_range(raw in batch(), s in strategy()) {
        let r = analyze_records(&raw, s, None, today());
        for t in &r.analyzed_tasks {
            let b = &t.score_breakdown;
            for v in [b.urgency, b.importance, b.effort, b.dependencies, t.score] {
                prop_assert!((0.0..=1.0).contains(&v), "{} out of range for {}", v, t.id);
            }
        }
    }

    #[test]
    fn cycle_members_are_linked_with_wraparound(raw in batch()) {
        let tasks = normalize(&raw).tasks;
        let graph = DependencyGraph::build(&tasks);
        for c in graph.find_cycles() {
            prop_assert!(!c.tasks.is_empty());
            for (i, from) in c.tasks.iter().enumerate() {
                let to = &c.tasks[(i + 1) % c.tasks.len()];
                prop_assert!(graph.has_edge(from, to), "cycle {} missing {} -> {}", c.cycle_id, from, to);
            }
        }
    }

    #[test]
    fn analysis_is_idempotent(raw in batch(), s in strategy()) {
        let first = serde_json::to_string(&analyze_records(&raw, s, None, today())).unwrap();
        let second = serde_json::to_string(&analyze_records(&raw, s, None, today())).unwrap();
        prop_assert_eq!(first, second);
    }
}
