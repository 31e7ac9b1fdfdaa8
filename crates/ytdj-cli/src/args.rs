use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use ytdj_core::audio::AudioFormat;

#[derive(Parser)]
#[command(name = "ytdj")]
#[command(author, version, about = "Download YouTube videos as high-quality audio for DJing")]
#[command(propagate_version = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube video or playlist URLs to download
    #[arg(value_name = "URL", required = true)]
    pub urls: Vec<String>,

    /// Output directory [default: downloads]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Audio format [default: mp3]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Audio quality for MP3, e.g. 320k, 256k, 192k [default: 320k]. Ignored for WAV/FLAC
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that yt-dlp and ffmpeg are installed
    Doctor,

    /// Show configuration
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// MP3 - Lossy, widely compatible
    Mp3,
    /// WAV - Uncompressed PCM
    Wav,
    /// FLAC - Lossless compression
    Flac,
}

impl From<OutputFormat> for AudioFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Mp3 => AudioFormat::Mp3,
            OutputFormat::Wav => AudioFormat::Wav,
            OutputFormat::Flac => AudioFormat::Flac,
        }
    }
}
