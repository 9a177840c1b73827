use crate::error::{AudioError, AudioResult};
use crate::vad::GateStrategy;
use std::path::PathBuf;

/// Noise-gate strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateKind {
    /// Whole-signal RMS gate
    Rms,
    /// Whole-signal smoothed-envelope gate
    Envelope,
    /// Per-segment RMS gate
    #[default]
    Segment,
}

/// How the denoiser is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenoiseMode {
    /// Suppress the spectrum estimated from an explicit noise profile across
    /// the whole working signal
    #[default]
    ProfileGuided,
    /// Classify segments with the configured gate and denoise only those
    /// flagged as noise, each from its own noise-floor estimate
    SegmentAdaptive,
}

/// Tunable parameters for one file's cleaning pipeline.
///
/// Defaults follow the telephony voice band (300–3400 Hz) with a 1-second
/// leading noise-profile window. All paths are passed explicitly at call
/// time; nothing is read from process-wide state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Band-pass low cutoff in Hz
    pub low_cutoff_hz: f32,
    /// Band-pass high cutoff in Hz
    pub high_cutoff_hz: f32,
    /// Band-pass order per band edge
    pub filter_order: usize,
    /// Envelope moving-average width in samples
    pub envelope_smoothing_width: usize,
    /// Normalized envelope threshold for trimming, in (0, 1]
    pub trim_threshold: f32,
    /// Segment duration in seconds for the segment gate
    pub segment_duration_s: f32,
    /// RMS level below which a region counts as noise
    pub noise_rms_threshold: f32,
    /// Suppression strength in [0, 1]
    pub suppression_strength: f32,
    /// Length of the leading noise-profile window in seconds
    pub noise_profile_duration_s: f32,
    /// Noise-gate strategy
    pub gate: GateKind,
    /// Denoiser driving mode
    pub denoise_mode: DenoiseMode,
    /// Trim before denoising (default); the alternative denoises the full
    /// filtered signal and trims afterwards
    pub trim_first: bool,
    /// Zero-phase band-pass (default); false selects the cheaper causal pass
    pub zero_phase: bool,
    /// Resample to this rate before filtering, when a collaborator asks for it
    pub resample_to: Option<u32>,
    /// Write envelope/waveform CSV side files next to each output
    pub diagnostics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            low_cutoff_hz: 300.0,
            high_cutoff_hz: 3400.0,
            filter_order: 6,
            envelope_smoothing_width: 100,
            trim_threshold: 0.2,
            segment_duration_s: 0.05,
            noise_rms_threshold: 0.005,
            suppression_strength: 1.0,
            noise_profile_duration_s: 1.0,
            gate: GateKind::default(),
            denoise_mode: DenoiseMode::default(),
            trim_first: true,
            zero_phase: true,
            resample_to: None,
            diagnostics: false,
        }
    }
}

impl PipelineConfig {
    /// Check parameter ranges that are not covered by filter-spec validation
    pub fn validate(&self) -> AudioResult<()> {
        if !(self.trim_threshold > 0.0 && self.trim_threshold <= 1.0) {
            return Err(AudioError::Config(format!(
                "trim threshold must be in (0, 1], got {}",
                self.trim_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.suppression_strength) {
            return Err(AudioError::Config(format!(
                "suppression strength must be in [0, 1], got {}",
                self.suppression_strength
            )));
        }
        if self.envelope_smoothing_width == 0 {
            return Err(AudioError::Config(
                "envelope smoothing width must be at least 1".to_string(),
            ));
        }
        if self.segment_duration_s <= 0.0 {
            return Err(AudioError::Config(format!(
                "segment duration must be positive, got {}",
                self.segment_duration_s
            )));
        }
        if self.noise_profile_duration_s < 0.0 {
            return Err(AudioError::Config(format!(
                "noise profile duration must not be negative, got {}",
                self.noise_profile_duration_s
            )));
        }
        Ok(())
    }

    /// Build the configured gate strategy
    pub fn gate_strategy(&self) -> GateStrategy {
        match self.gate {
            GateKind::Rms => GateStrategy::RmsGate {
                threshold: self.noise_rms_threshold,
            },
            GateKind::Envelope => GateStrategy::EnvelopeGate {
                threshold: self.noise_rms_threshold,
                smoothing: self.envelope_smoothing_width,
            },
            GateKind::Segment => GateStrategy::SegmentGate {
                segment_duration_s: self.segment_duration_s,
                threshold: self.noise_rms_threshold,
            },
        }
    }
}

/// Parameters for a batch run over a folder of recordings
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory walked recursively for decodable audio files
    pub input_dir: PathBuf,
    /// Directory receiving `cleaned_<name>.wav` outputs
    pub output_dir: PathBuf,
    /// Worker pool size
    pub workers: usize,
    /// Where to write the aggregate report CSV, if anywhere
    pub report_path: Option<PathBuf>,
    /// Per-file pipeline parameters
    pub pipeline: PipelineConfig,
}

impl BatchConfig {
    /// Create a batch config with default pipeline parameters
    pub fn new<P: Into<PathBuf>>(input_dir: P, output_dir: P) -> Self {
        BatchConfig {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            workers: 4,
            report_path: None,
            pipeline: PipelineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.low_cutoff_hz, 300.0);
        assert_eq!(config.high_cutoff_hz, 3400.0);
        assert_eq!(config.noise_profile_duration_s, 1.0);
        assert!(config.trim_first);
        assert!(config.zero_phase);
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let mut config = PipelineConfig::default();
        config.trim_threshold = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.suppression_strength = 1.5;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.envelope_smoothing_width = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.segment_duration_s = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gate_strategy_selection() {
        let mut config = PipelineConfig::default();

        config.gate = GateKind::Rms;
        assert!(matches!(
            config.gate_strategy(),
            crate::vad::GateStrategy::RmsGate { .. }
        ));

        config.gate = GateKind::Segment;
        assert!(matches!(
            config.gate_strategy(),
            crate::vad::GateStrategy::SegmentGate { .. }
        ));
    }
}
