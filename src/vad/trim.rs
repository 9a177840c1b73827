use crate::error::{AudioError, AudioResult};

/// Result of trimming a signal to its voice-active region
#[derive(Debug, Clone, PartialEq)]
pub struct TrimResult {
    /// Cropped samples covering the active region
    pub samples: Vec<f32>,
    /// First sample index of the active region (inclusive)
    pub start: usize,
    /// One past the last sample index of the active region (exclusive)
    pub end: usize,
}

/// Crop a signal to the region where its normalized envelope exceeds a
/// threshold.
///
/// The envelope is normalized by its global maximum before comparison, so
/// the same threshold generalizes across recordings of different loudness.
/// `start` is the minimum index exceeding the threshold; `end` is one past
/// the maximum such index. If nothing exceeds the threshold (silent or
/// entirely sub-threshold input) the signal is returned unmodified with
/// indices `(0, len)`.
pub fn trim_by_envelope(
    samples: &[f32],
    envelope: &[f32],
    threshold: f32,
) -> AudioResult<TrimResult> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(AudioError::Config(format!(
            "trim threshold must be in (0, 1], got {threshold}"
        )));
    }
    if envelope.len() != samples.len() {
        return Err(AudioError::Config(format!(
            "envelope length {} does not match signal length {}",
            envelope.len(),
            samples.len()
        )));
    }

    let max = envelope.iter().cloned().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return Ok(TrimResult {
            samples: samples.to_vec(),
            start: 0,
            end: samples.len(),
        });
    }

    let exceeds = |v: f32| v / max > threshold;
    let first = envelope.iter().position(|&v| exceeds(v));
    let last = envelope.iter().rposition(|&v| exceeds(v));

    match (first, last) {
        (Some(start), Some(last)) => {
            let end = last + 1;
            Ok(TrimResult {
                samples: samples[start..end].to_vec(),
                start,
                end,
            })
        }
        _ => Ok(TrimResult {
            samples: samples.to_vec(),
            start: 0,
            end: samples.len(),
        }),
    }
}
