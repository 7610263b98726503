// ============================================================
// Layer 6 - Evaluation Metrics Logger
// ============================================================
// Records the error of every evaluated matte to a CSV file.
//
// Columns:
//   - name: file name of the evaluated matte
//   - mse:  squared error over the unknown-region pixel count
//   - sad:  sum of absolute differences / 1000
//
// Output file: <dir>/test_metrics.csv
//
// Example CSV output:
//   name,mse,sad
//   GT01.png,0.012345,4.567800
//   GT02.png,0.009876,3.210000
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

/// File name of the evaluation CSV inside its directory.
pub const METRICS_FILE: &str = "test_metrics.csv";

/// One row of the evaluation CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    /// File name of the evaluated matte
    pub name: String,

    /// MSE normalised by the unknown-region size
    pub mse: f64,

    /// SAD scaled down by 1000
    pub sad: f64,
}

impl EvalRecord {
    pub fn new(name: impl Into<String>, mse: f64, sad: f64) -> Self {
        Self { name: name.into(), mse, sad }
    }
}

/// Appends evaluation rows to a CSV file.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger in `dir`.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join(METRICS_FILE);

        // A rerun appends below the rows of the previous run.
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "name,mse,sad")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one record as a new row.
    pub fn log(&self, record: &EvalRecord) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{:.6},{:.6}", record.name, record.mse, record.sad)?;

        tracing::debug!(
            "Logged {}: mse={:.6}, sad={:.4}",
            record.name,
            record.mse,
            record.sad,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EvalRecord::new("a.png", 0.5, 1.25)).unwrap();
        logger.log(&EvalRecord::new("b.png", 0.0, 0.0)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, ["name,mse,sad", "a.png,0.500000,1.250000", "b.png,0.000000,0.000000"]);
    }

    #[test]
    fn test_reopening_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        MetricsLogger::new(dir.path())
            .unwrap()
            .log(&EvalRecord::new("a.png", 0.1, 0.2))
            .unwrap();

        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EvalRecord::new("b.png", 0.3, 0.4)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(csv.matches("name,mse,sad").count(), 1);
    }
}
