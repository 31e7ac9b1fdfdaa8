//! Error types for ytdj-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, YtDjError>;

#[derive(Error, Debug)]
pub enum YtDjError {
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Missing dependency: {0}")]
    Dependency(#[from] DependencyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("yt-dlp failed with exit code: {0:?}")]
    YtDlpFailed(Option<i32>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("Failed to parse metadata: {0}")]
    MetadataParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("ffmpeg not found. Please install ffmpeg first.")]
    FfmpegNotFound,

    #[error("yt-dlp not found. Please install yt-dlp first.")]
    YtDlpNotFound,
}

impl DependencyError {
    /// Platform-specific installation instructions
    pub fn install_hint(&self) -> &'static str {
        match self {
            DependencyError::FfmpegNotFound => {
                "On Ubuntu/Debian: sudo apt install ffmpeg\n\
                 On macOS: brew install ffmpeg\n\
                 On Windows: Download from https://ffmpeg.org/download.html"
            }
            DependencyError::YtDlpNotFound => {
                "With pip: pip install yt-dlp\n\
                 On macOS: brew install yt-dlp\n\
                 Or download a release from https://github.com/yt-dlp/yt-dlp/releases"
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
