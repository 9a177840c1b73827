use crate::core::Signal;
use crate::denoise::{Denoiser, NoiseProfile};
use crate::error::{AudioError, AudioResult};
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Default analysis frame length in samples
const DEFAULT_FFT_SIZE: usize = 1024;

/// Signals shorter than this pass through untouched
const MIN_FFT_SIZE: usize = 64;

/// Minimum per-bin gain, keeps residual ambience instead of hard silence
const GAIN_FLOOR: f32 = 0.02;

/// Fraction of lowest-energy frames used for the self-adaptive noise estimate
const SELF_NOISE_FRACTION: usize = 10;

/// STFT spectral-gating denoiser.
///
/// Hann-windowed frames at 75% overlap; each bin is attenuated by a gain
/// derived from the ratio of its magnitude to the estimated noise magnitude.
/// With a [`NoiseProfile`] the noise spectrum is averaged over the profile
/// clip; without one it is averaged over the lowest-energy tenth of the
/// signal's own frames.
pub struct SpectralDenoiser {
    fft_size: usize,
}

impl SpectralDenoiser {
    /// Create a denoiser with an explicit analysis frame length
    pub fn new(fft_size: usize) -> Self {
        SpectralDenoiser { fft_size }
    }

    /// Average magnitude spectrum over all frames of a clip.
    ///
    /// Clips shorter than one frame are zero-padded to a single frame.
    fn magnitude_profile(
        clip: &[f32],
        fft_size: usize,
        hop: usize,
        window: &[f32],
        forward: &Arc<dyn RealToComplex<f32>>,
    ) -> Vec<f32> {
        let bins = fft_size / 2 + 1;
        let mut sum = vec![0.0f32; bins];
        let mut frames = 0usize;

        let mut accumulate = |frame: &[f32]| {
            let mut buffer: Vec<f32> = frame.iter().zip(window).map(|(s, w)| s * w).collect();
            buffer.resize(fft_size, 0.0);

            let mut spectrum = forward.make_output_vec();
            if forward.process(&mut buffer, &mut spectrum).is_ok() {
                for (acc, c) in sum.iter_mut().zip(&spectrum) {
                    *acc += c.norm();
                }
                frames += 1;
            }
        };

        if clip.len() < fft_size {
            accumulate(clip);
        } else {
            let mut pos = 0;
            while pos + fft_size <= clip.len() {
                accumulate(&clip[pos..pos + fft_size]);
                pos += hop;
            }
        }

        if frames > 0 {
            for v in &mut sum {
                *v /= frames as f32;
            }
        }

        sum
    }

    /// Noise estimate from the lowest-energy frames of the signal itself
    fn low_energy_profile(
        samples: &[f32],
        fft_size: usize,
        hop: usize,
        window: &[f32],
        forward: &Arc<dyn RealToComplex<f32>>,
    ) -> Vec<f32> {
        let mut frame_energies: Vec<(usize, f32)> = Vec::new();
        let mut pos = 0;
        while pos + fft_size <= samples.len() {
            let energy: f32 = samples[pos..pos + fft_size].iter().map(|s| s * s).sum();
            frame_energies.push((pos, energy));
            pos += hop;
        }

        if frame_energies.is_empty() {
            return Self::magnitude_profile(samples, fft_size, hop, window, forward);
        }

        frame_energies.sort_by(|a, b| a.1.total_cmp(&b.1));
        let quiet_count = (frame_energies.len() / SELF_NOISE_FRACTION).max(1);

        let bins = fft_size / 2 + 1;
        let mut sum = vec![0.0f32; bins];
        let mut frames = 0usize;

        for &(start, _) in frame_energies.iter().take(quiet_count) {
            let mut buffer: Vec<f32> = samples[start..start + fft_size]
                .iter()
                .zip(window)
                .map(|(s, w)| s * w)
                .collect();

            let mut spectrum = forward.make_output_vec();
            if forward.process(&mut buffer, &mut spectrum).is_ok() {
                for (acc, c) in sum.iter_mut().zip(&spectrum) {
                    *acc += c.norm();
                }
                frames += 1;
            }
        }

        if frames > 0 {
            for v in &mut sum {
                *v /= frames as f32;
            }
        }

        sum
    }
}

impl Default for SpectralDenoiser {
    fn default() -> Self {
        SpectralDenoiser::new(DEFAULT_FFT_SIZE)
    }
}

impl Denoiser for SpectralDenoiser {
    fn denoise(
        &self,
        signal: &Signal,
        profile: Option<&NoiseProfile>,
        strength: f32,
    ) -> AudioResult<Signal> {
        if !(0.0..=1.0).contains(&strength) {
            return Err(AudioError::Config(format!(
                "suppression strength must be in [0, 1], got {strength}"
            )));
        }

        let samples = signal.samples();
        let n = samples.len();

        // Shrink the frame for short inputs; below the minimum there is not
        // enough material to estimate a spectrum, so pass through unchanged
        let mut fft_size = self.fft_size.max(MIN_FFT_SIZE);
        while fft_size > n {
            fft_size /= 2;
        }
        if fft_size < MIN_FFT_SIZE {
            return Ok(signal.clone());
        }

        let hop = fft_size / 4;
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos())
            })
            .collect();

        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        let noise_mag = match profile {
            Some(p) if !p.is_empty() => {
                // A profile longer than the signal is clamped, never an error
                let clip = &p.samples()[..p.len().min(n)];
                Self::magnitude_profile(clip, fft_size, hop, &window, &forward)
            }
            _ => Self::low_energy_profile(samples, fft_size, hop, &window, &forward),
        };

        let mut output = vec![0.0f32; n];
        let mut window_sum = vec![0.0f32; n];

        let mut pos = 0;
        while pos + fft_size <= n {
            let mut buffer: Vec<f32> = samples[pos..pos + fft_size]
                .iter()
                .zip(&window)
                .map(|(s, w)| s * w)
                .collect();

            let mut spectrum = forward.make_output_vec();
            if forward.process(&mut buffer, &mut spectrum).is_ok() {
                for (c, &noise) in spectrum.iter_mut().zip(&noise_mag) {
                    let signal_mag = c.norm();

                    let raw_gain = if signal_mag > 0.0 {
                        let snr = signal_mag / (noise + 1e-10);
                        ((snr - 1.0) / snr).max(GAIN_FLOOR)
                    } else {
                        GAIN_FLOOR
                    };

                    // strength interpolates between passthrough and the full mask
                    let gain = 1.0 - strength * (1.0 - raw_gain);
                    *c = *c * gain;
                }

                let mut time_buffer = inverse.make_output_vec();
                if inverse.process(&mut spectrum, &mut time_buffer).is_ok() {
                    let norm = 1.0 / fft_size as f32;
                    for (i, sample) in time_buffer.iter().enumerate() {
                        output[pos + i] += sample * norm * window[i];
                        window_sum[pos + i] += window[i] * window[i];
                    }
                }
            }

            pos += hop;
        }

        // Overlap-add normalization; samples the frame grid never covered
        // (window tails, trailing remainder) keep their original value
        let mut out = samples.to_vec();
        for i in 0..n {
            if window_sum[i] > 1e-3 {
                out[i] = output[i] / window_sum[i];
            }
        }

        Signal::new(out, signal.sample_rate())
    }
}
