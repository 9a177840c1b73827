//! voiceclean Command Line Interface
//!
//! Cleans speech recordings: band-pass, voice-activity trim, noise
//! suppression. Works on one file or a whole folder.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use voiceclean::pipeline::{
    BatchConfig, DenoiseMode, GateKind, PipelineConfig, run_batch, run_file,
};

#[derive(Parser)]
#[command(name = "voiceclean")]
#[command(about = "Speech recording cleaner - band-pass, trim, denoise", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a single audio file
    Clean {
        /// Input audio file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        #[command(flatten)]
        dsp: DspArgs,
    },

    /// Clean every audio file under a folder
    Batch {
        /// Input directory (walked recursively)
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory for cleaned files
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Number of parallel workers
        #[arg(short, long, default_value_t = 4)]
        workers: usize,

        /// Write the aggregate report CSV here
        #[arg(short, long, value_name = "FILE")]
        report: Option<PathBuf>,

        #[command(flatten)]
        dsp: DspArgs,
    },
}

#[derive(Args)]
struct DspArgs {
    /// Band-pass low cutoff in Hz
    #[arg(long, default_value_t = 300.0)]
    low_cutoff: f32,

    /// Band-pass high cutoff in Hz
    #[arg(long, default_value_t = 3400.0)]
    high_cutoff: f32,

    /// Band-pass order per band edge
    #[arg(long, default_value_t = 6)]
    filter_order: usize,

    /// Envelope smoothing width in samples
    #[arg(long, default_value_t = 100)]
    smoothing: usize,

    /// Normalized envelope threshold for trimming, in (0, 1]
    #[arg(long, default_value_t = 0.2)]
    trim_threshold: f32,

    /// Segment duration in seconds for the segment gate
    #[arg(long, default_value_t = 0.05)]
    segment_duration: f32,

    /// RMS level below which a region counts as noise
    #[arg(long, default_value_t = 0.005)]
    noise_threshold: f32,

    /// Suppression strength in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    strength: f32,

    /// Leading noise-profile window in seconds
    #[arg(long, default_value_t = 1.0)]
    profile_duration: f32,

    /// Noise-gate strategy
    #[arg(long, value_enum, default_value = "segment")]
    gate: GateArg,

    /// Denoiser driving mode
    #[arg(long, value_enum, default_value = "profile")]
    denoise_mode: ModeArg,

    /// Denoise the full signal before trimming instead of after
    #[arg(long)]
    denoise_first: bool,

    /// Single-pass causal band-pass instead of zero-phase
    #[arg(long)]
    causal: bool,

    /// Resample to this rate before processing
    #[arg(long, value_name = "RATE")]
    resample: Option<u32>,

    /// Write envelope/waveform CSV side files next to each output
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum GateArg {
    Rms,
    Envelope,
    Segment,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Profile,
    Segments,
}

impl DspArgs {
    fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            low_cutoff_hz: self.low_cutoff,
            high_cutoff_hz: self.high_cutoff,
            filter_order: self.filter_order,
            envelope_smoothing_width: self.smoothing,
            trim_threshold: self.trim_threshold,
            segment_duration_s: self.segment_duration,
            noise_rms_threshold: self.noise_threshold,
            suppression_strength: self.strength,
            noise_profile_duration_s: self.profile_duration,
            gate: match self.gate {
                GateArg::Rms => GateKind::Rms,
                GateArg::Envelope => GateKind::Envelope,
                GateArg::Segment => GateKind::Segment,
            },
            denoise_mode: match self.denoise_mode {
                ModeArg::Profile => DenoiseMode::ProfileGuided,
                ModeArg::Segments => DenoiseMode::SegmentAdaptive,
            },
            trim_first: !self.denoise_first,
            zero_phase: !self.causal,
            resample_to: self.resample,
            diagnostics: self.diagnostics,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("voiceclean {}", voiceclean::VERSION);

    match cli.command {
        Commands::Clean { input, output, dsp } => {
            let config = dsp.into_config();
            let report = run_file(&config, &input, &output);

            println!("{}", report.csv_line());
            if !report.succeeded() {
                std::process::exit(1);
            }
        }
        Commands::Batch {
            input,
            output,
            workers,
            report,
            dsp,
        } => {
            let config = BatchConfig {
                input_dir: input,
                output_dir: output,
                workers,
                report_path: report,
                pipeline: dsp.into_config(),
            };

            let summary = run_batch(&config)?;
            println!(
                "{} file(s) cleaned, {} failed",
                summary.successes(),
                summary.failures()
            );
        }
    }

    Ok(())
}
