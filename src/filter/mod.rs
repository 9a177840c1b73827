//! Signal filters: band-limiting, envelope extraction, resampling

pub mod bandpass;
pub mod envelope;
pub mod resample;

pub use bandpass::{BandPass, FilterSpec};
pub use envelope::envelope;
pub use resample::Resample;

use crate::core::Signal;
use crate::error::AudioResult;

/// Trait for signal filters
pub trait Filter {
    /// Process a signal through this filter
    fn process(&mut self, signal: &Signal) -> AudioResult<Signal>;
}
