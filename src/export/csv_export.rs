//! CSV export of membrane voltage traces.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::membrane::VoltageTrace;

/// One row of the exported trace
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    /// Simulation time (ms)
    pub time_ms: f64,
    /// Membrane potential (mV)
    pub voltage_mV: f64,
}

/// CSV writer for voltage traces
pub struct CsvTraceExporter {
    writer: csv::Writer<File>,
    rows_written: usize,
    /// Path to output file
    path: PathBuf,
}

impl CsvTraceExporter {
    /// Create an exporter writing a timestamped file inside `dir`
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("trace_{}.csv", timestamp));
        Self::create(path)
    }

    /// Create an exporter writing to exactly `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let writer = csv::Writer::from_writer(file);

        log::info!("CSV export started: {}", path.display());

        Ok(Self {
            writer,
            rows_written: 0,
            path,
        })
    }

    /// Write one sample
    pub fn record(&mut self, time_ms: f64, voltage_mV: f64) -> Result<()> {
        self.writer.serialize(TraceRecord { time_ms, voltage_mV })?;
        self.rows_written += 1;
        Ok(())
    }

    /// Write every sample of `trace`
    pub fn write_trace(&mut self, trace: &VoltageTrace) -> Result<()> {
        for (time_ms, voltage_mV) in trace.iter() {
            self.record(time_ms, voltage_mV)?;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!(
            "CSV export completed: {} ({} rows)",
            self.path.display(),
            self.rows_written
        );
        Ok(self.path)
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write a whole trace to `path` in one call
pub fn export_trace_csv<P: AsRef<Path>>(trace: &VoltageTrace, path: P) -> Result<PathBuf> {
    let mut exporter = CsvTraceExporter::create(path)?;
    exporter.write_trace(trace)?;
    exporter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_trace_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut trace = VoltageTrace::new(0.5, true);
        trace.voltages_mV = vec![-63.0, -63.1, -63.19];

        let path = export_trace_csv(&trace, dir.path().join("trace.csv")).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], "time_ms,voltage_mV");
        assert_eq!(lines[1], "0.0,-63.0");
        assert_eq!(lines[2], "0.5,-63.1");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_timestamped_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = CsvTraceExporter::new(dir.path().join("exports")).unwrap();
        exporter.record(0.0, -65.0).unwrap();
        assert_eq!(exporter.rows_written(), 1);

        let path = exporter.finish().unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("trace_"));
    }
}
