//! taskrank-ingest: turn task documents (JSON payloads, CSV exports) into
//! raw task records for the ranking pipeline.

pub mod csv_tasks;
pub mod request;

pub use csv_tasks::parse_tasks_csv;
pub use request::{AnalysisRequest, SourceFormat, parse_request_json, read_request};
