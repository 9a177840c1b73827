//! Audio decoder implementations

pub mod symphonia;

pub use symphonia::SymphoniaDecoder;

use crate::core::Signal;
use crate::error::AudioResult;
use std::path::Path;

/// Trait for audio decoders producing mono sample blocks
pub trait Decoder: Send {
    /// Get the next block of mono samples, or `None` at end of stream
    fn decode_block(&mut self) -> AudioResult<Option<Vec<f32>>>;

    /// Native sample rate of the source
    fn sample_rate(&self) -> u32;

    /// Check if decoder is finished
    fn is_finished(&self) -> bool;
}

/// Create a decoder from a file path
pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Box<dyn Decoder>> {
    let path = path.as_ref();
    SymphoniaDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
}

/// Drain a decoder into a single mono signal
pub fn collect_signal(decoder: &mut dyn Decoder) -> AudioResult<Signal> {
    let sample_rate = decoder.sample_rate();
    let mut samples = Vec::new();

    while let Some(block) = decoder.decode_block()? {
        samples.extend(block);
    }

    Signal::new(samples, sample_rate)
}

/// Decode an entire audio file to a mono signal at its native sample rate.
///
/// Compressed formats (mp3, flac, ogg, ...) are decoded directly; multi-channel
/// sources are downmixed to mono by averaging channels.
pub fn decode_file<P: AsRef<Path>>(path: P) -> AudioResult<Signal> {
    let mut decoder = from_file(path)?;
    collect_signal(decoder.as_mut())
}
