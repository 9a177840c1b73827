use crate::core::Signal;
use crate::error::{AudioError, AudioResult};
use crate::filter::Filter;
use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type};
use std::f32::consts::PI;

/// Band-pass filter specification.
///
/// `order` is the roll-off order at each band edge, realized as cascaded
/// second-order sections; odd orders are rounded up to the next even order.
/// Orders above 10 offer little extra rejection and start to degrade
/// numerically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    /// Low cutoff in Hz
    pub low_hz: f32,
    /// High cutoff in Hz
    pub high_hz: f32,
    /// Filter order per band edge
    pub order: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl FilterSpec {
    /// Validate and create a filter spec.
    ///
    /// Cutoffs are never clamped: a spec that does not satisfy
    /// `0 < low < high < sample_rate / 2` is rejected outright.
    pub fn new(low_hz: f32, high_hz: f32, order: usize, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if order == 0 {
            return Err(AudioError::InvalidSpec(
                "filter order must be at least 1".to_string(),
            ));
        }
        if low_hz <= 0.0 || high_hz <= 0.0 {
            return Err(AudioError::InvalidSpec(format!(
                "cutoffs must be positive, got [{low_hz}, {high_hz}]"
            )));
        }
        if low_hz >= high_hz {
            return Err(AudioError::InvalidSpec(format!(
                "low cutoff {low_hz} Hz must be below high cutoff {high_hz} Hz"
            )));
        }
        let nyquist = sample_rate as f32 / 2.0;
        if high_hz >= nyquist {
            return Err(AudioError::InvalidSpec(format!(
                "high cutoff {high_hz} Hz must be below Nyquist {nyquist} Hz"
            )));
        }

        Ok(FilterSpec {
            low_hz,
            high_hz,
            order,
            sample_rate,
        })
    }

    /// Nyquist frequency for this spec
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }
}

/// Butterworth-style band-pass filter.
///
/// Built as a high-pass cascade at the low cutoff plus a low-pass cascade at
/// the high cutoff. Default application is zero-phase (forward pass, then a
/// second pass over the reversed signal) so downstream envelope detection is
/// not shifted by group delay; `causal()` switches to a single forward pass,
/// which is cheaper but moves detected speech boundaries later.
pub struct BandPass {
    sections: Vec<Coefficients<f32>>,
    zero_phase: bool,
}

impl BandPass {
    /// Design a band-pass filter for the given spec.
    ///
    /// Deterministic: identical specs always produce identical coefficients.
    pub fn design(spec: &FilterSpec) -> AudioResult<Self> {
        let fs = spec.sample_rate as f32;
        let mut sections = Vec::with_capacity(spec.order.div_ceil(2) * 2);

        for q in section_q_values(spec.order) {
            let highpass = Coefficients::<f32>::from_params(
                Type::HighPass,
                fs.hz(),
                spec.low_hz.hz(),
                q,
            )
            .map_err(|e| AudioError::InvalidSpec(format!("high-pass design failed: {e:?}")))?;
            let lowpass = Coefficients::<f32>::from_params(
                Type::LowPass,
                fs.hz(),
                spec.high_hz.hz(),
                q,
            )
            .map_err(|e| AudioError::InvalidSpec(format!("low-pass design failed: {e:?}")))?;

            sections.push(highpass);
            sections.push(lowpass);
        }

        Ok(BandPass {
            sections,
            zero_phase: true,
        })
    }

    /// Switch to single-pass causal filtering (phase-shifting)
    pub fn causal(mut self) -> Self {
        self.zero_phase = false;
        self
    }

    /// Apply the filter in place with zero-phase (forward-backward) passes
    pub fn apply_zero_phase(&self, samples: &mut [f32]) {
        self.run_cascade(samples);
        samples.reverse();
        self.run_cascade(samples);
        samples.reverse();
    }

    /// Apply the filter in place with a single causal forward pass
    pub fn apply_causal(&self, samples: &mut [f32]) {
        self.run_cascade(samples);
    }

    fn run_cascade(&self, samples: &mut [f32]) {
        for coeffs in &self.sections {
            // Fresh state per section and per pass
            let mut section = DirectForm2Transposed::<f32>::new(*coeffs);
            for sample in samples.iter_mut() {
                *sample = section.run(*sample);
            }
        }
    }
}

impl Filter for BandPass {
    fn process(&mut self, signal: &Signal) -> AudioResult<Signal> {
        let mut samples = signal.samples().to_vec();
        if self.zero_phase {
            self.apply_zero_phase(&mut samples);
        } else {
            self.apply_causal(&mut samples);
        }
        Signal::new(samples, signal.sample_rate())
    }
}

/// Q values for the second-order sections of a Butterworth cascade.
///
/// Poles of an order-n Butterworth prototype sit at angles
/// `(2k + 1) * pi / (2n)`; each conjugate pair maps to one section with
/// `Q = 1 / (2 sin(angle))`.
fn section_q_values(order: usize) -> Vec<f32> {
    let n = order.div_ceil(2) * 2;
    (0..n / 2)
        .map(|k| {
            let angle = PI * (2 * k + 1) as f32 / (2 * n) as f32;
            1.0 / (2.0 * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vad::rms;

    fn tone(freq: f32, amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_spec_validation() {
        let spec = FilterSpec::new(300.0, 3400.0, 6, 16000).unwrap();
        assert_eq!(spec.nyquist(), 8000.0);
        assert!(FilterSpec::new(3400.0, 300.0, 6, 16000).is_err());
        assert!(FilterSpec::new(300.0, 300.0, 6, 16000).is_err());
        assert!(FilterSpec::new(0.0, 3400.0, 6, 16000).is_err());
        assert!(FilterSpec::new(300.0, -1.0, 6, 16000).is_err());
        assert!(FilterSpec::new(300.0, 8000.0, 6, 16000).is_err());
        assert!(FilterSpec::new(300.0, 3400.0, 0, 16000).is_err());
        assert!(FilterSpec::new(300.0, 3400.0, 6, 0).is_err());
    }

    #[test]
    fn test_butterworth_section_qs() {
        let qs = section_q_values(2);
        assert_eq!(qs.len(), 1);
        assert!((qs[0] - 0.7071).abs() < 1e-3);

        let qs = section_q_values(4);
        assert_eq!(qs.len(), 2);
        assert!((qs[0] - 1.3066).abs() < 1e-3);
        assert!((qs[1] - 0.5412).abs() < 1e-3);

        // Odd orders round up
        assert_eq!(section_q_values(5).len(), 3);
    }

    #[test]
    fn test_length_preserved() {
        let spec = FilterSpec::new(300.0, 3400.0, 6, 16000).unwrap();
        let mut bp = BandPass::design(&spec).unwrap();

        let signal = Signal::new(tone(440.0, 0.5, 16000, 12345), 16000).unwrap();
        let filtered = bp.process(&signal).unwrap();
        assert_eq!(filtered.len(), signal.len());
    }

    #[test]
    fn test_passband_preserved_stopband_rejected() {
        let spec = FilterSpec::new(300.0, 3400.0, 6, 16000).unwrap();
        let bp = BandPass::design(&spec).unwrap();

        let mut in_band = tone(1000.0, 0.5, 16000, 16000);
        let in_band_rms = rms(&in_band);
        bp.apply_zero_phase(&mut in_band);
        assert!(rms(&in_band) > in_band_rms * 0.8);

        let mut below = tone(50.0, 0.5, 16000, 16000);
        let below_rms = rms(&below);
        bp.apply_zero_phase(&mut below);
        assert!(rms(&below) < below_rms * 0.05);

        let mut above = tone(7000.0, 0.5, 16000, 16000);
        let above_rms = rms(&above);
        bp.apply_zero_phase(&mut above);
        assert!(rms(&above) < above_rms * 0.05);
    }

    #[test]
    fn test_deterministic_design() {
        let spec = FilterSpec::new(300.0, 3400.0, 6, 16000).unwrap();
        let a = BandPass::design(&spec).unwrap();
        let b = BandPass::design(&spec).unwrap();

        let input = tone(700.0, 0.3, 16000, 4000);
        let mut out_a = input.clone();
        let mut out_b = input;
        a.apply_zero_phase(&mut out_a);
        b.apply_zero_phase(&mut out_b);
        assert_eq!(out_a, out_b);
    }
}
