//! CSV task exports.
//!
//! Expected header (order free, case-insensitive, extra columns ignored):
//!   id,title,due_date,importance,estimated_hours,dependencies
//!
//! Cells stay strings and the normalizer does all coercion, so a CSV row goes
//! through the same warning trail as a hand-written JSON record. The one
//! exception is `dependencies`: a comma-separated cell is how a list is
//! written in CSV, so it becomes an array of ids here. Empty cells are left
//! out of the record so they take defaults silently.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io::Read;

const KNOWN_COLUMNS: &[&str] = &[
    "id",
    "title",
    "due_date",
    "importance",
    "estimated_hours",
    "dependencies",
];

pub fn parse_tasks_csv<R: Read>(reader: R) -> Result<Vec<Value>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let mut out = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading CSV row {}", line + 2))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut task = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() || !KNOWN_COLUMNS.contains(&header.as_str()) {
                continue;
            }
            let value = if header == "dependencies" {
                split_ids(cell)
            } else {
                Value::String(cell.to_string())
            };
            task.insert(header.clone(), value);
        }
        out.push(Value::Object(task));
    }

    Ok(out)
}

fn split_ids(cell: &str) -> Value {
    cell.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| Value::String(id.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_basic_rows() {
        let text = "\
id,title,due_date,importance,estimated_hours,dependencies
t1,Write report,2026-03-04,8,3,
t2,Review,,five,1.5,\"t1, t3\"
";
        let rows = parse_tasks_csv(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            json!({"id": "t1", "title": "Write report", "due_date": "2026-03-04", "importance": "8", "estimated_hours": "3"})
        );
        assert_eq!(rows[1]["importance"], json!("five"));
        assert_eq!(rows[1]["dependencies"], json!(["t1", "t3"]));
        assert!(rows[1].get("due_date").is_none());
    }

    #[test]
    fn test_header_case_and_unknown_columns() {
        let text = "ID,Title,Owner\nx,Ship it,sam\n,,\n";
        let rows = parse_tasks_csv(text.as_bytes()).unwrap();
        assert_eq!(rows, vec![json!({"id": "x", "title": "Ship it"})]);
    }

    #[test]
    fn test_rows_flow_through_normalizer() {
        let text = "id,importance,dependencies\na,11,\"b, c\"\nb,3,\nc,4,b\n";
        let rows = parse_tasks_csv(text.as_bytes()).unwrap();
        let n = taskrank_core::normalize(&rows);
        assert_eq!(n.tasks[0].importance, 10);
        assert_eq!(n.tasks[0].dependencies, ["b", "c"]);
        assert_eq!(n.tasks[2].dependencies, ["b"]);
        assert_eq!(n.warnings.get("a"), ["importance value '11' normalized to 10"]);
        assert!(n.warnings.get("b").is_empty());
        assert!(n.warnings.get("c").is_empty());
    }
}
