#![warn(missing_docs)]

//! # voiceclean: Speech Recording Cleaning Pipeline
//!
//! Batch denoising for speech-command recordings: band-limiting, envelope
//! driven voice-activity trimming, and adaptive spectral noise suppression.
//!
//! ## Features
//!
//! - **Decode** - WAV, MP3, FLAC, OGG and more via Symphonia, downmixed to mono
//! - **Band-limit** - Butterworth-style band-pass, zero-phase by default
//! - **Trim** - envelope-threshold crop to the voice-active region
//! - **Denoise** - STFT spectral gating, profile-guided or segment-adaptive
//! - **Batch** - bounded worker pool over a folder, per-file reports
//!
//! ## Quick Start
//!
//! ```ignore
//! use voiceclean::pipeline::{run_file, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let report = run_file(&config, "noisy.wav".as_ref(), "cleaned.wav".as_ref());
//! assert!(report.succeeded());
//! ```

// Declare modules
/// Core audio types and structures
pub mod core;
/// Error types for audio operations
pub mod error;
/// Audio decoder implementations
pub mod decoder;
/// Audio encoder implementations
pub mod encoder;
/// Signal filters and envelope extraction
pub mod filter;
/// Voice-activity trimming, segmentation, and noise gating
pub mod vad;
/// Adaptive noise suppression
pub mod denoise;
/// Per-file pipeline and batch orchestration
pub mod pipeline;

// Export public types
pub use crate::core::Signal;
pub use crate::error::{AudioError, AudioResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
