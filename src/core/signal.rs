use crate::error::{AudioError, AudioResult};
use std::time::Duration;

/// Mono audio signal: an ordered sequence of f32 samples at a fixed rate.
///
/// Samples are not guaranteed to be normalized to [-1.0, 1.0]; the decoder
/// produces values in that range but intermediate filter stages may exceed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Sample values, one channel
    samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 16000, 44100)
    sample_rate: u32,
}

impl Signal {
    /// Create a new signal.
    ///
    /// Fails when `sample_rate` is zero. A zero-length sample buffer is
    /// allowed; emptiness is checked where it matters (pipeline entry).
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        Ok(Signal {
            samples,
            sample_rate,
        })
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get mutable reference to the samples
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Get owned samples (consumes signal)
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the signal
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Copy of a sample sub-range as a new signal at the same rate
    pub fn slice(&self, start: usize, end: usize) -> AudioResult<Signal> {
        if start > end || end > self.samples.len() {
            return Err(AudioError::Config(format!(
                "slice [{start}, {end}) out of range for signal of {} samples",
                self.samples.len()
            )));
        }

        Signal::new(self.samples[start..end].to_vec(), self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_creation() {
        let signal = Signal::new(vec![0.1, 0.2, 0.3, 0.4], 16000).unwrap();

        assert_eq!(signal.sample_rate(), 16000);
        assert_eq!(signal.len(), 4);
        assert!(!signal.is_empty());
    }

    #[test]
    fn test_signal_invalid_rate() {
        let result = Signal::new(vec![0.1, 0.2], 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_signal_empty_allowed() {
        let signal = Signal::new(Vec::new(), 16000).unwrap();
        assert!(signal.is_empty());
        assert_eq!(signal.duration(), Duration::ZERO);
    }

    #[test]
    fn test_signal_sample_access() {
        let mut signal = Signal::new(vec![0.1, 0.2], 16000).unwrap();
        signal.samples_mut()[0] = 0.9;
        assert_eq!(signal.samples(), &[0.9, 0.2]);
        assert_eq!(signal.into_samples(), vec![0.9, 0.2]);
    }

    #[test]
    fn test_signal_duration() {
        let signal = Signal::new(vec![0.0; 8000], 16000).unwrap();
        assert_eq!(signal.duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_signal_slice() {
        let signal = Signal::new(vec![0.0, 1.0, 2.0, 3.0], 16000).unwrap();
        let sliced = signal.slice(1, 3).unwrap();
        assert_eq!(sliced.samples(), &[1.0, 2.0]);

        assert!(signal.slice(3, 1).is_err());
        assert!(signal.slice(0, 5).is_err());
    }
}
