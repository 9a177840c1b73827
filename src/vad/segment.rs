use crate::error::{AudioError, AudioResult};

/// Contiguous sub-range of a signal with a noise classification flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First sample index (inclusive)
    pub start: usize,
    /// One past the last sample index (exclusive)
    pub end: usize,
    /// Whether the segment was classified as noise
    pub noise: bool,
}

impl Segment {
    /// Number of samples covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the segment covers no samples
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Samples per segment for a duration in seconds
pub fn samples_per_segment(sample_rate: u32, duration_s: f32) -> AudioResult<usize> {
    let samples = (duration_s as f64 * sample_rate as f64).floor() as usize;
    if samples == 0 {
        return Err(AudioError::Config(format!(
            "segment duration {duration_s} s is shorter than one sample at {sample_rate} Hz"
        )));
    }
    Ok(samples)
}

/// Partition `len` samples into consecutive fixed-duration segments.
///
/// Every sample belongs to exactly one segment; the final segment may be
/// shorter. Segments come back unflagged (`noise == false`).
pub fn split_segments(len: usize, sample_rate: u32, duration_s: f32) -> AudioResult<Vec<Segment>> {
    let step = samples_per_segment(sample_rate, duration_s)?;

    let mut segments = Vec::with_capacity(len.div_ceil(step.max(1)));
    let mut start = 0;
    while start < len {
        let end = (start + step).min(len);
        segments.push(Segment {
            start,
            end,
            noise: false,
        });
        start = end;
    }

    Ok(segments)
}
