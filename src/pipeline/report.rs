use crate::error::{AudioError, AudioResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of one file's pipeline run.
///
/// Created once per processed file and immutable afterwards; the batch
/// runner serializes these into the aggregate CSV.
#[derive(Debug, Clone)]
pub struct ProcessingReport {
    /// Source file
    pub input_path: PathBuf,
    /// Written output, when the pipeline reached persistence
    pub output_path: Option<PathBuf>,
    /// Wall-clock processing time; `None` when the file was skipped before
    /// any work happened (empty signal)
    pub duration: Option<Duration>,
    /// Resident-memory delta across the run in MB, when measurable
    pub memory_delta_mb: Option<f64>,
    /// First sample index of the kept region
    pub trim_start: usize,
    /// One past the last sample index of the kept region
    pub trim_end: usize,
    /// Why the pipeline failed, if it did
    pub error: Option<String>,
}

impl ProcessingReport {
    /// CSV header matching [`csv_line`](Self::csv_line)
    pub const CSV_HEADER: &'static str =
        "input_path,output_path,duration_ms,memory_delta_mb,trim_start_sample,trim_end_sample,error";

    /// Whether the file made it through the whole pipeline
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// One CSV row for this report
    pub fn csv_line(&self) -> String {
        let duration_ms = self
            .duration
            .map(|d| format!("{:.2}", d.as_secs_f64() * 1000.0))
            .unwrap_or_default();
        let memory = self
            .memory_delta_mb
            .map(|m| format!("{m:.2}"))
            .unwrap_or_default();

        format!(
            "{},{},{},{},{},{},{}",
            self.input_path.display(),
            self.output_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            duration_ms,
            memory,
            self.trim_start,
            self.trim_end,
            self.error.as_deref().unwrap_or_default(),
        )
    }
}

/// Write all reports as a CSV file
pub fn write_report_csv(path: &Path, reports: &[ProcessingReport]) -> AudioResult<()> {
    let file = File::create(path)
        .map_err(|e| AudioError::Write(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", ProcessingReport::CSV_HEADER)?;
    for report in reports {
        writeln!(writer, "{}", report.csv_line())?;
    }

    Ok(())
}

/// Current resident set size in MB, when the platform exposes it
#[cfg(target_os = "linux")]
pub fn resident_memory_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024.0)
}

/// Current resident set size in MB, when the platform exposes it
#[cfg(not(target_os = "linux"))]
pub fn resident_memory_mb() -> Option<f64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ProcessingReport {
        ProcessingReport {
            input_path: PathBuf::from("in/a.wav"),
            output_path: Some(PathBuf::from("out/cleaned_a.wav")),
            duration: Some(Duration::from_millis(125)),
            memory_delta_mb: Some(1.5),
            trim_start: 48000,
            trim_end: 80000,
            error: None,
        }
    }

    #[test]
    fn test_csv_line_success() {
        let line = sample_report().csv_line();
        assert_eq!(line, "in/a.wav,out/cleaned_a.wav,125.00,1.50,48000,80000,");
    }

    #[test]
    fn test_csv_line_failure_has_empty_timing() {
        let report = ProcessingReport {
            input_path: PathBuf::from("in/bad.wav"),
            output_path: None,
            duration: None,
            memory_delta_mb: None,
            trim_start: 0,
            trim_end: 0,
            error: Some("empty signal".to_string()),
        };

        assert!(!report.succeeded());
        assert_eq!(report.csv_line(), "in/bad.wav,,,,0,0,empty signal");
    }

    #[test]
    fn test_write_report_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report_csv(&path, &[sample_report()]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some(ProcessingReport::CSV_HEADER));
        assert!(lines.next().unwrap().starts_with("in/a.wav,"));
    }
}
