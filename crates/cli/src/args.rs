use std::path::PathBuf;

use clap::Parser;

use flacsweep_core::{Config, ConverterConfig, ProcessorConfig};

/// Convert every ALAC file under a directory to FLAC and delete the originals.
#[derive(Debug, Parser)]
#[command(name = "flacsweep", version)]
pub struct Cli {
    /// Root directory to scan recursively.
    pub dir: PathBuf,

    /// Number of files to convert at once.
    #[arg(short = 'j', long, default_value_t = 1)]
    pub jobs: usize,

    /// Report what would be converted without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Give up on a single ffprobe/ffmpeg run after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to the ffmpeg binary.
    #[arg(long, value_name = "PATH", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Path to the ffprobe binary.
    #[arg(long, value_name = "PATH", default_value = "ffprobe")]
    pub ffprobe: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter when RUST_LOG is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn to_config(&self) -> Config {
        let mut converter = ConverterConfig::with_paths(self.ffmpeg.clone(), self.ffprobe.clone());
        if let Some(secs) = self.timeout {
            converter = converter.with_timeout(secs);
        }

        let processor = ProcessorConfig::default()
            .with_max_conversions(self.jobs)
            .with_dry_run(self.dry_run);

        Config::new(converter, processor)
    }
}
