//! Export functionality for simulation data.
//!
//! Provides CSV voltage-trace export and JSON summary export.

mod csv_export;
mod json_export;

pub use csv_export::{export_trace_csv, CsvTraceExporter, TraceRecord};
pub use json_export::{export_summary_json, export_summary_json_to, SummaryExport};
