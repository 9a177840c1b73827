use crate::error::{AudioError, AudioResult};

/// Compute a smoothed amplitude envelope: rectify, then moving average.
///
/// The average is centered; windows shrink at the signal boundaries rather
/// than padding, so the output is exactly as long as the input. A width
/// larger than the signal is clamped to the signal length. Width 1 yields
/// `|samples|` elementwise.
pub fn envelope(samples: &[f32], width: usize) -> AudioResult<Vec<f32>> {
    if width == 0 {
        return Err(AudioError::Config(
            "envelope smoothing width must be at least 1".to_string(),
        ));
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let width = width.min(samples.len());
    let half = width / 2;

    // Prefix sums of |x| in f64 to keep long averages stable
    let mut prefix = Vec::with_capacity(samples.len() + 1);
    let mut acc = 0.0f64;
    prefix.push(acc);
    for &s in samples {
        acc += s.abs() as f64;
        prefix.push(acc);
    }

    let out = (0..samples.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + width - half).min(samples.len());
            ((prefix[hi] - prefix[lo]) / (hi - lo) as f64) as f32
        })
        .collect();

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_one_is_abs() {
        let samples = vec![0.5, -0.25, 0.0, -1.0, 0.75];
        let env = envelope(&samples, 1).unwrap();
        let expected: Vec<f32> = samples.iter().map(|s| s.abs()).collect();

        assert_eq!(env.len(), samples.len());
        for (e, x) in env.iter().zip(&expected) {
            assert!((e - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_non_negative_and_length_preserving() {
        let samples: Vec<f32> = (0..500).map(|i| ((i as f32) * 0.1).sin() - 0.3).collect();
        for width in [1, 7, 64, 500] {
            let env = envelope(&samples, width).unwrap();
            assert_eq!(env.len(), samples.len());
            assert!(env.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_width_larger_than_signal_is_clamped() {
        let samples = vec![0.5, -0.5, 0.5];
        let env = envelope(&samples, 100).unwrap();
        assert_eq!(env.len(), 3);
        // Fully-shrunk interior window still averages what is available
        assert!(env.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(envelope(&[0.1, 0.2], 0).is_err());
    }

    #[test]
    fn test_empty_signal() {
        let env = envelope(&[], 10).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_constant_signal_flat_envelope() {
        let samples = vec![-0.4; 256];
        let env = envelope(&samples, 32).unwrap();
        for &v in &env {
            assert!((v - 0.4).abs() < 1e-6);
        }
    }
}
