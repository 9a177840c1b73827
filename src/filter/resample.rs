use crate::core::Signal;
use crate::error::{AudioError, AudioResult};

/// Linear-interpolation resampler.
///
/// Only used when a collaborator explicitly requests a target rate (for
/// example a dataset-preparation step that wants 16 kHz); the pipeline never
/// resamples on its own.
pub struct Resample {
    input_rate: u32,
    output_rate: u32,
}

impl Resample {
    /// Create a new resampler
    pub fn new(input_rate: u32, output_rate: u32) -> AudioResult<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }

        Ok(Resample {
            input_rate,
            output_rate,
        })
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Linear interpolation resampling
    fn linear_resample(input: &[f32], ratio: f64) -> Vec<f32> {
        if input.is_empty() || ratio <= 0.0 {
            return Vec::new();
        }

        let output_len = (input.len() as f64 / ratio).ceil() as usize;
        let mut output = Vec::with_capacity(output_len);

        for i in 0..output_len {
            let input_pos = i as f64 * ratio;
            let input_idx = input_pos.floor() as usize;

            if input_idx + 1 < input.len() {
                let frac = input_pos - input_idx as f64;
                let sample = (input[input_idx] as f64 * (1.0 - frac)
                    + input[input_idx + 1] as f64 * frac) as f32;
                output.push(sample);
            } else if input_idx < input.len() {
                output.push(input[input_idx]);
            }
        }

        output
    }
}

impl super::Filter for Resample {
    fn process(&mut self, signal: &Signal) -> AudioResult<Signal> {
        if signal.sample_rate() != self.input_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: signal.sample_rate(),
            });
        }

        if self.input_rate == self.output_rate {
            return Ok(signal.clone());
        }

        let ratio = self.input_rate as f64 / self.output_rate as f64;
        let resampled = Self::linear_resample(signal.samples(), ratio);

        Signal::new(resampled, self.output_rate)
    }
}
