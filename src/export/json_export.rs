//! JSON export of run summaries.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::membrane::TraceSummary;

/// Summary export structure
#[derive(Debug, Clone, Serialize)]
pub struct SummaryExport<'a> {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    /// Scalar statistics of the trace
    pub summary: &'a TraceSummary,
    /// Named reversal potentials / driving forces worth reporting (mV)
    pub potentials_mV: Vec<(String, f64)>,
}

const EXPORT_VERSION: &str = "1.0.0";

/// Export a summary to a timestamped JSON file in `dir`
///
/// Filename: `summary_YYYYMMDD_HHMMSS.json`
pub fn export_summary_json<P: AsRef<Path>>(
    summary: &TraceSummary,
    potentials_mV: Vec<(String, f64)>,
    dir: P,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let filename = format!("summary_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    export_summary_json_to(summary, potentials_mV, &path)?;
    Ok(path)
}

/// Export a summary to a specific file
pub fn export_summary_json_to<P: AsRef<Path>>(
    summary: &TraceSummary,
    potentials_mV: Vec<(String, f64)>,
    path: P,
) -> Result<()> {
    let export = SummaryExport {
        exported_at: Local::now().to_rfc3339(),
        version: EXPORT_VERSION,
        summary,
        potentials_mV,
    };

    let file = std::fs::File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &export)?;

    log::info!("JSON summary exported: {}", path.as_ref().display());
    Ok(())
}
