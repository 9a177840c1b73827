//! Per-file cleaning pipeline and batch orchestration

pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod report;

pub use batch::{BatchSummary, run_batch};
pub use config::{BatchConfig, DenoiseMode, GateKind, PipelineConfig};
pub use report::ProcessingReport;

use crate::core::Signal;
use crate::decoder;
use crate::denoise::{Denoiser, NoiseProfile, SpectralDenoiser};
use crate::encoder;
use crate::error::{AudioError, AudioResult};
use crate::filter::{BandPass, Filter, FilterSpec, Resample, envelope};
use crate::vad::{GateStrategy, trim_by_envelope};
use log::{debug, error, info, warn};
use std::path::Path;
use std::time::Instant;

/// Stages a file passes through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Source decoded to a mono signal
    Loaded,
    /// Band-pass applied
    Filtered,
    /// Envelope extracted
    EnvelopeComputed,
    /// Cropped to the voice-active region
    Trimmed,
    /// Noise suppression applied
    Denoised,
    /// Output written to the sink
    Persisted,
}

/// Run the cleaning pipeline for one file, catching every error at this
/// boundary.
///
/// Always returns a report; failures are recorded in its `error` field and
/// logged, never propagated, so a batch caller can keep going.
pub fn run_file(config: &PipelineConfig, input: &Path, output: &Path) -> ProcessingReport {
    let mem_before = report::resident_memory_mb();
    let started = Instant::now();

    match process_file(config, input, output) {
        Ok((trim_start, trim_end)) => {
            let duration = started.elapsed();
            let memory_delta_mb = match (mem_before, report::resident_memory_mb()) {
                (Some(before), Some(after)) => Some(after - before),
                _ => None,
            };
            info!(
                "cleaned {} -> {} in {:.2} s (kept samples {}..{})",
                input.display(),
                output.display(),
                duration.as_secs_f64(),
                trim_start,
                trim_end
            );
            ProcessingReport {
                input_path: input.to_path_buf(),
                output_path: Some(output.to_path_buf()),
                duration: Some(duration),
                memory_delta_mb,
                trim_start,
                trim_end,
                error: None,
            }
        }
        Err(AudioError::EmptySignal) => {
            warn!("{}: empty signal, skipped", input.display());
            ProcessingReport {
                input_path: input.to_path_buf(),
                output_path: None,
                duration: None,
                memory_delta_mb: None,
                trim_start: 0,
                trim_end: 0,
                error: Some(AudioError::EmptySignal.to_string()),
            }
        }
        Err(e) => {
            error!("{}: {}", input.display(), e);
            ProcessingReport {
                input_path: input.to_path_buf(),
                output_path: None,
                duration: Some(started.elapsed()),
                memory_delta_mb: None,
                trim_start: 0,
                trim_end: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

/// The pipeline proper; returns the kept sample range on success
fn process_file(config: &PipelineConfig, input: &Path, output: &Path) -> AudioResult<(usize, usize)> {
    config.validate()?;

    let signal = decoder::decode_file(input)?;
    if signal.is_empty() {
        return Err(AudioError::EmptySignal);
    }
    debug!("{}: {:?}", input.display(), PipelineStage::Loaded);

    // Collaborator-requested resampling only; never forced
    let signal = match config.resample_to {
        Some(rate) if rate != signal.sample_rate() => {
            Resample::new(signal.sample_rate(), rate)?.process(&signal)?
        }
        _ => signal,
    };

    let spec = FilterSpec::new(
        config.low_cutoff_hz,
        config.high_cutoff_hz,
        config.filter_order,
        signal.sample_rate(),
    )?;
    let mut bandpass = BandPass::design(&spec)?;
    if !config.zero_phase {
        bandpass = bandpass.causal();
    }
    let filtered = bandpass.process(&signal)?;
    debug!("{}: {:?}", input.display(), PipelineStage::Filtered);

    let env = envelope(filtered.samples(), config.envelope_smoothing_width)?;
    debug!("{}: {:?}", input.display(), PipelineStage::EnvelopeComputed);

    let denoiser = SpectralDenoiser::default();

    let (final_signal, trim_start, trim_end) = if config.trim_first {
        let trimmed = trim_by_envelope(filtered.samples(), &env, config.trim_threshold)?;
        debug!("{}: {:?}", input.display(), PipelineStage::Trimmed);

        // Prefer the lead-in before the detected speech onset as the noise
        // profile; it is the one region known to carry no speech. When the
        // onset is at sample 0, fall back to the leading window.
        let profile = if trimmed.start > 0 {
            let profile_len = (config.noise_profile_duration_s as f64
                * filtered.sample_rate() as f64) as usize;
            NoiseProfile::new(filtered.samples()[..trimmed.start.min(profile_len)].to_vec())
        } else {
            NoiseProfile::leading(&filtered, config.noise_profile_duration_s)
        };

        let working = Signal::new(trimmed.samples, filtered.sample_rate())?;
        let denoised = denoise_working(config, &denoiser, &working, &profile)?;
        debug!("{}: {:?}", input.display(), PipelineStage::Denoised);

        if config.diagnostics {
            diagnostics::write_envelope_csv(output, &env)?;
            diagnostics::write_waveform_csv(output, working.samples(), denoised.samples())?;
        }

        (denoised, trimmed.start, trimmed.end)
    } else {
        // Alternative ordering: denoise the full filtered signal, then trim
        let profile = NoiseProfile::leading(&filtered, config.noise_profile_duration_s);
        let denoised = denoise_working(config, &denoiser, &filtered, &profile)?;
        debug!("{}: {:?}", input.display(), PipelineStage::Denoised);

        let env_after = envelope(denoised.samples(), config.envelope_smoothing_width)?;
        let trimmed = trim_by_envelope(denoised.samples(), &env_after, config.trim_threshold)?;
        debug!("{}: {:?}", input.display(), PipelineStage::Trimmed);

        if config.diagnostics {
            diagnostics::write_envelope_csv(output, &env_after)?;
            diagnostics::write_waveform_csv(output, denoised.samples(), &trimmed.samples)?;
        }

        let start = trimmed.start;
        let end = trimmed.end;
        (
            Signal::new(trimmed.samples, denoised.sample_rate())?,
            start,
            end,
        )
    };

    encoder::write_wav_file(output, &final_signal)?;
    debug!("{}: {:?}", input.display(), PipelineStage::Persisted);

    Ok((trim_start, trim_end))
}

/// Dispatch to the configured denoising mode
fn denoise_working(
    config: &PipelineConfig,
    denoiser: &dyn Denoiser,
    working: &Signal,
    profile: &NoiseProfile,
) -> AudioResult<Signal> {
    match config.denoise_mode {
        DenoiseMode::ProfileGuided => {
            denoiser.denoise(working, Some(profile), config.suppression_strength)
        }
        DenoiseMode::SegmentAdaptive => denoise_segments(
            denoiser,
            working,
            &config.gate_strategy(),
            config.suppression_strength,
        ),
    }
}

/// Denoise only the segments the gate flags as noise; speech segments pass
/// through untouched
fn denoise_segments(
    denoiser: &dyn Denoiser,
    signal: &Signal,
    gate: &GateStrategy,
    strength: f32,
) -> AudioResult<Signal> {
    let segments = gate.classify(signal.samples(), signal.sample_rate())?;
    let mut out = signal.samples().to_vec();

    for seg in segments.iter().filter(|s| s.noise) {
        let piece = signal.slice(seg.start, seg.end)?;
        let cleaned = denoiser.denoise(&piece, None, strength)?;
        out[seg.start..seg.end].copy_from_slice(cleaned.samples());
    }

    Signal::new(out, signal.sample_rate())
}
