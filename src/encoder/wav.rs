use crate::core::Signal;
use crate::error::{AudioError, AudioResult};
use hound::{WavSpec, WavWriter};
use std::path::Path;

/// WAV audio encoder writing mono 32-bit float samples
pub struct WavEncoder {
    writer: Option<WavWriter<std::io::BufWriter<std::fs::File>>>,
    sample_rate: u32,
}

impl WavEncoder {
    /// Create a new WAV encoder to file
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> AudioResult<Self> {
        let path = path.as_ref();
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .map_err(|e| AudioError::Write(format!("{}: {}", path.display(), e)))?;

        Ok(WavEncoder {
            writer: Some(writer),
            sample_rate,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u32 {
        self.writer.as_ref().map(|w| w.len()).unwrap_or(0)
    }
}

impl super::Encoder for WavEncoder {
    fn encode(&mut self, signal: &Signal) -> AudioResult<()> {
        if signal.sample_rate() != self.sample_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: signal.sample_rate(),
            });
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::Write("encoder already finalized".to_string()))?;

        for &sample in signal.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| AudioError::Write(e.to_string()))?;
        }

        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| AudioError::Write(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use tempfile::NamedTempFile;

    #[test]
    fn test_wav_encoder_creation() {
        let temp_file = NamedTempFile::new().unwrap();
        let encoder = WavEncoder::create(temp_file.path(), 16000);
        assert!(encoder.is_ok());
    }

    #[test]
    fn test_wav_encoder_write() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut encoder = WavEncoder::create(temp_file.path(), 16000).unwrap();

        let signal = Signal::new(vec![0.0, 0.1, -0.1, 0.5], 16000).unwrap();

        assert!(encoder.encode(&signal).is_ok());
        assert_eq!(encoder.samples_written(), 4);
        assert!(encoder.finalize().is_ok());
    }

    #[test]
    fn test_wav_encoder_invalid_sample_rate() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut encoder = WavEncoder::create(temp_file.path(), 16000).unwrap();

        let signal = Signal::new(vec![0.0, 0.1], 48000).unwrap();

        assert!(encoder.encode(&signal).is_err());
    }

    #[test]
    fn test_write_wav_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let signal = Signal::new(vec![0.25, -0.25, 0.5, -0.5], 16000).unwrap();

        crate::encoder::write_wav_file(&path, &signal).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let read: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(read, signal.samples());
    }
}
