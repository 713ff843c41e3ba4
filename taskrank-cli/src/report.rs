//! Plain-text rendering for terminal output.

use chrono::NaiveDate;
use taskrank_core::{AnalyzedTask, RunMeta, RunResult, Suggestion};

fn task_line(rank: usize, t: &AnalyzedTask) -> String {
    let mut line = format!(
        "{:>2}. [{:?}] {:.4} | {} | importance={} hours={} | {}\n",
        rank, t.tier, t.score, t.title, t.importance, t.estimated_hours, t.explanation
    );
    for w in &t.warnings {
        line.push_str(&format!("      ! {w}\n"));
    }
    line
}

fn meta_lines(meta: &RunMeta) -> String {
    let mut out = String::new();
    if !meta.cycles.is_empty() {
        out.push_str("\n## Circular dependencies\n\n");
        for c in &meta.cycles {
            out.push_str(&format!(
                "- #{}: {} ({})\n",
                c.cycle_id,
                c.tasks.join(" -> "),
                c.message
            ));
        }
    }
    out
}

pub fn render_ranking(result: &RunResult, today: NaiveDate, limit: Option<usize>) -> String {
    let mut out = format!(
        "# Ranked tasks ({}, as of {})\n\n",
        result.meta.strategy_used, today
    );

    if result.analyzed_tasks.is_empty() {
        out.push_str("(no tasks)\n");
        return out;
    }

    let shown = limit.unwrap_or(result.analyzed_tasks.len());
    for (i, t) in result.analyzed_tasks.iter().take(shown).enumerate() {
        out.push_str(&task_line(i + 1, t));
    }
    if shown < result.analyzed_tasks.len() {
        out.push_str(&format!(
            "... {} more (use --limit)\n",
            result.analyzed_tasks.len() - shown
        ));
    }

    out.push_str(&meta_lines(&result.meta));
    out
}

pub fn render_suggestion(s: &Suggestion) -> String {
    let mut out = String::from("# Top suggestions for today\n\n");
    if s.suggested_tasks.is_empty() {
        out.push_str("(no tasks)\n");
    }
    for (i, t) in s.suggested_tasks.iter().enumerate() {
        out.push_str(&task_line(i + 1, t));
    }
    out.push_str(&meta_lines(&s.meta));
    out
}
