//! Download form: choices, submission and validation

use std::ffi::OsString;
use ytdj_core::{audio::AudioFormat, classify::is_youtube_url, error::DependencyError, Config};

/// Format picker entries, in display order
pub const FORMAT_CHOICES: &[(&str, AudioFormat)] = &[
    ("MP3 (Lossy)", AudioFormat::Mp3),
    ("WAV (Lossless)", AudioFormat::Wav),
    ("FLAC (Lossless)", AudioFormat::Flac),
];

pub const MP3_QUALITIES: &[&str] = &["320k", "256k", "192k", "128k"];

/// Quality token sent for lossless formats
pub const LOSSLESS_QUALITY: &str = "best";

pub const TIPS: &[&str] = &[
    "WAV files are larger but highest quality",
    "FLAC offers good compression with no quality loss",
    "MP3 320k is good for most DJ applications",
    "Playlist URLs are saved into their own folder",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub format: AudioFormat,
    pub quality: String,
    pub url: String,
}

impl FormSubmission {
    /// `mp3_quality` is only consulted for MP3
    pub fn new(format: AudioFormat, mp3_quality: &str, url: &str) -> Self {
        let quality = if format.is_lossless() {
            LOSSLESS_QUALITY
        } else {
            mp3_quality
        };

        Self {
            format,
            quality: quality.to_string(),
            url: url.trim().to_string(),
        }
    }

    /// Arguments for the `ytdj` child process
    pub fn download_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.format.extension().to_string(),
            "-q".to_string(),
            self.quality.clone(),
            self.url.clone(),
        ]
    }

    /// Every problem with this submission; empty means it may be launched
    pub fn validate(&self, config: &Config) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.url.is_empty() {
            errors.push(ValidationError::EmptyUrl);
        } else if !is_youtube_url(&self.url) {
            errors.push(ValidationError::NotYouTube);
        }

        if let Err(source) = config.ffmpeg_path() {
            errors.push(ValidationError::Dependency {
                hint: source.install_hint(),
                source,
            });
        }

        errors
    }
}

/// Environment that makes the `ytdj` child see the form's configuration.
///
/// The child loads its own config, so anything the form resolved (a
/// `--config` file, overrides) is forwarded as `YTDJ_*` variables.
pub fn child_env(config: &Config) -> Vec<(String, OsString)> {
    let mut envs = Vec::new();

    if let Ok(ffmpeg) = config.ffmpeg_path() {
        envs.push(("YTDJ_PATHS__FFMPEG".to_string(), ffmpeg.into_os_string()));
    }
    if let Ok(yt_dlp) = config.yt_dlp_path() {
        envs.push(("YTDJ_PATHS__YT_DLP".to_string(), yt_dlp.into_os_string()));
    }
    envs.push((
        "YTDJ_OUTPUT__DEFAULT_DIRECTORY".to_string(),
        config.output.default_directory.clone().into_os_string(),
    ));

    envs
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a YouTube URL")]
    EmptyUrl,

    #[error("Please enter a valid YouTube URL")]
    NotYouTube,

    #[error("{source}\n{hint}")]
    Dependency {
        source: DependencyError,
        hint: &'static str,
    },
}
