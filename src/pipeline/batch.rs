use crate::error::{AudioError, AudioResult};
use crate::pipeline::config::BatchConfig;
use crate::pipeline::report::{ProcessingReport, write_report_csv};
use crate::pipeline::run_file;
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions handed to the decoder during folder discovery
pub const DECODABLE_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

/// Aggregate result of a batch run
#[derive(Debug)]
pub struct BatchSummary {
    /// One report per discovered input file, in discovery order
    pub reports: Vec<ProcessingReport>,
}

impl BatchSummary {
    /// Number of files that failed
    pub fn failures(&self) -> usize {
        self.reports.iter().filter(|r| !r.succeeded()).count()
    }

    /// Number of files cleaned successfully
    pub fn successes(&self) -> usize {
        self.reports.len() - self.failures()
    }
}

/// Recursively discover decodable audio files under a directory, sorted for
/// deterministic report ordering
pub fn discover_files(input_dir: &Path) -> AudioResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(input_dir) {
        let entry = entry.map_err(|e| {
            AudioError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walk failed")
            }))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let decodable = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| DECODABLE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);

        if decodable {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Output path for one input: `<output_dir>/cleaned_<stem>.wav`
fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    output_dir.join(format!("cleaned_{stem}.wav"))
}

/// Clean every decodable file under the input directory.
///
/// Files run on a bounded worker pool; each file's pipeline is independent
/// and a failure never cancels the others. The call blocks until all workers
/// join, then writes the aggregate report CSV (if requested) so no partial
/// state ever hits disk. Per-file errors land in the reports; this function
/// itself only fails on setup problems (bad worker count, unreadable input
/// directory, unwritable output directory or report).
pub fn run_batch(config: &BatchConfig) -> AudioResult<BatchSummary> {
    if config.workers == 0 {
        return Err(AudioError::Config(
            "worker count must be at least 1".to_string(),
        ));
    }
    config.pipeline.validate()?;

    let files = discover_files(&config.input_dir)?;
    info!(
        "batch: {} file(s) under {}, {} worker(s)",
        files.len(),
        config.input_dir.display(),
        config.workers
    );

    std::fs::create_dir_all(&config.output_dir)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| AudioError::Config(e.to_string()))?;

    let reports: Vec<ProcessingReport> = pool.install(|| {
        files
            .par_iter()
            .map(|input| {
                let output = output_path_for(input, &config.output_dir);
                run_file(&config.pipeline, input, &output)
            })
            .collect()
    });

    let summary = BatchSummary { reports };
    if summary.failures() > 0 {
        warn!(
            "batch finished: {} cleaned, {} failed",
            summary.successes(),
            summary.failures()
        );
    } else {
        info!("batch finished: {} cleaned", summary.successes());
    }

    if let Some(report_path) = &config.report_path {
        write_report_csv(report_path, &summary.reports)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Signal;
    use crate::encoder;
    use std::f32::consts::PI;

    fn write_fixture(path: &Path) {
        let sample_rate = 16000u32;
        let mut samples = vec![0.0f32; sample_rate as usize];
        for i in 0..sample_rate as usize {
            let t = i as f32 / sample_rate as f32;
            samples.push(0.5 * (2.0 * PI * 440.0 * t).sin());
        }
        samples.extend(vec![0.0f32; sample_rate as usize / 2]);

        let signal = Signal::new(samples, sample_rate).unwrap();
        encoder::write_wav_file(path, &signal).unwrap();
    }

    #[test]
    fn test_batch_with_corrupt_file_returns_normally() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        std::fs::create_dir_all(&input_dir).unwrap();

        write_fixture(&input_dir.join("a.wav"));
        write_fixture(&input_dir.join("b.wav"));
        std::fs::write(input_dir.join("c.wav"), b"corrupt bytes, not audio").unwrap();

        let mut config = BatchConfig::new(input_dir, output_dir.clone());
        config.workers = 2;
        config.report_path = Some(dir.path().join("report.csv"));

        let summary = run_batch(&config).unwrap();

        assert_eq!(summary.reports.len(), 3);
        assert_eq!(summary.successes(), 2);
        assert_eq!(summary.failures(), 1);

        let failed: Vec<_> = summary.reports.iter().filter(|r| !r.succeeded()).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].input_path.ends_with("c.wav"));
        assert!(failed[0].error.as_deref().unwrap().contains("decode"));

        // Outputs for the two good files, report written after the join
        assert!(output_dir.join("cleaned_a.wav").exists());
        assert!(output_dir.join("cleaned_b.wav").exists());
        let report = std::fs::read_to_string(dir.path().join("report.csv")).unwrap();
        assert_eq!(report.lines().count(), 4);
    }

    #[test]
    fn test_discovery_skips_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(&dir.path().join("keep.wav"));
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();
        std::fs::write(dir.path().join("image.png"), b"skip me too").unwrap();

        let files = discover_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.wav"));
    }

    #[test]
    fn test_discovery_recurses_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("speaker1").join("session2");
        std::fs::create_dir_all(&nested).unwrap();
        write_fixture(&nested.join("deep.wav"));
        write_fixture(&dir.path().join("top.wav"));

        let files = discover_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BatchConfig::new(dir.path().to_path_buf(), dir.path().join("out"));
        config.workers = 0;
        assert!(run_batch(&config).is_err());
    }

    #[test]
    fn test_empty_folder_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        std::fs::create_dir_all(&input_dir).unwrap();

        let config = BatchConfig::new(input_dir, dir.path().join("out"));
        let summary = run_batch(&config).unwrap();
        assert!(summary.reports.is_empty());
        assert_eq!(summary.failures(), 0);
    }
}
