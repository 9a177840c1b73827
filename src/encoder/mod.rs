//! Audio encoder implementations

pub mod wav;

pub use wav::WavEncoder;

use crate::core::Signal;
use crate::error::AudioResult;
use std::path::Path;

/// Trait for audio encoders
pub trait Encoder {
    /// Encode a signal to output
    fn encode(&mut self, signal: &Signal) -> AudioResult<()>;

    /// Finalize encoding (flush any remaining data)
    fn finalize(&mut self) -> AudioResult<()> {
        Ok(())
    }
}

/// Write a signal to an uncompressed WAV file in one call
pub fn write_wav_file<P: AsRef<Path>>(path: P, signal: &Signal) -> AudioResult<()> {
    let mut encoder = WavEncoder::create(path, signal.sample_rate())?;
    encoder.encode(signal)?;
    encoder.finalize()
}
