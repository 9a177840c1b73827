use crate::error::AudioResult;
use crate::filter::envelope;
use crate::vad::segment::{Segment, split_segments};

/// Root-mean-square energy of a sample slice
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squared: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squared / samples.len() as f64).sqrt() as f32
}

/// Noise classification strategy.
///
/// All variants share one contract: a region is noise iff its energy
/// measure falls below the threshold. They differ only in what is measured
/// and at which granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateStrategy {
    /// Whole-signal gate on raw RMS
    RmsGate {
        /// RMS level below which the signal counts as noise
        threshold: f32,
    },
    /// Whole-signal gate on the mean of the smoothed envelope
    EnvelopeGate {
        /// Mean envelope level below which the signal counts as noise
        threshold: f32,
        /// Envelope smoothing width in samples
        smoothing: usize,
    },
    /// Per-segment RMS gate over fixed-duration segments
    SegmentGate {
        /// Segment duration in seconds
        segment_duration_s: f32,
        /// RMS level below which a segment counts as noise
        threshold: f32,
    },
}

impl GateStrategy {
    /// Classify a whole sample slice as noise or not.
    ///
    /// Stateless: repeated calls with the same input give the same answer.
    pub fn is_noise(&self, samples: &[f32]) -> AudioResult<bool> {
        match *self {
            GateStrategy::RmsGate { threshold } => Ok(rms(samples) < threshold),
            GateStrategy::EnvelopeGate {
                threshold,
                smoothing,
            } => {
                let env = envelope(samples, smoothing)?;
                let mean = if env.is_empty() {
                    0.0
                } else {
                    env.iter().map(|&v| v as f64).sum::<f64>() as f32 / env.len() as f32
                };
                Ok(mean < threshold)
            }
            GateStrategy::SegmentGate { threshold, .. } => Ok(rms(samples) < threshold),
        }
    }

    /// Partition a signal and flag each segment.
    ///
    /// `SegmentGate` yields one flagged segment per fixed-duration slice;
    /// the whole-signal strategies yield a single segment spanning the
    /// entire input.
    pub fn classify(&self, samples: &[f32], sample_rate: u32) -> AudioResult<Vec<Segment>> {
        match *self {
            GateStrategy::SegmentGate {
                segment_duration_s,
                threshold,
            } => {
                let mut segments = split_segments(samples.len(), sample_rate, segment_duration_s)?;
                for seg in &mut segments {
                    seg.noise = rms(&samples[seg.start..seg.end]) < threshold;
                }
                Ok(segments)
            }
            _ => {
                if samples.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(vec![Segment {
                    start: 0,
                    end: samples.len(),
                    noise: self.is_noise(samples)?,
                }])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(rms(&[0.0; 100]), 0.0);
        assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zeros_always_noise() {
        let zeros = vec![0.0f32; 800];
        for threshold in [0.001, 0.005, 0.5] {
            let gate = GateStrategy::RmsGate { threshold };
            assert!(gate.is_noise(&zeros).unwrap());
        }
    }

    #[test]
    fn test_loud_signal_never_noise() {
        let loud = vec![0.7f32; 800];
        let gate = GateStrategy::RmsGate { threshold: 0.005 };
        assert!(!gate.is_noise(&loud).unwrap());

        let gate = GateStrategy::EnvelopeGate {
            threshold: 0.005,
            smoothing: 100,
        };
        assert!(!gate.is_noise(&loud).unwrap());
    }

    #[test]
    fn test_segment_gate_flags_quiet_segments() {
        // 0.05 s segments at 16 kHz: [loud 800][quiet 800][short quiet tail]
        let mut samples = vec![0.5f32; 800];
        samples.extend(vec![0.001f32; 800]);
        samples.extend(vec![0.0f32; 100]);

        let gate = GateStrategy::SegmentGate {
            segment_duration_s: 0.05,
            threshold: 0.005,
        };
        let segments = gate.classify(&samples, 16000).unwrap();

        assert_eq!(segments.len(), 3);
        assert!(!segments[0].noise);
        assert!(segments[1].noise);
        assert!(segments[2].noise);
    }

    #[test]
    fn test_whole_signal_strategies_single_segment() {
        let samples = vec![0.0f32; 500];
        let gate = GateStrategy::RmsGate { threshold: 0.01 };
        let segments = gate.classify(&samples, 16000).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments[0].end, 500);
        assert!(segments[0].noise);
    }

    #[test]
    fn test_classify_empty() {
        let gate = GateStrategy::RmsGate { threshold: 0.01 };
        assert!(gate.classify(&[], 16000).unwrap().is_empty());
    }
}
