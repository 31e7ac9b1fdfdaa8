//! Target audio format and quality selection

use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
        }
    }

    pub fn is_lossless(&self) -> bool {
        matches!(self, AudioFormat::Wav | AudioFormat::Flac)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Mp3 => write!(f, "MP3"),
            AudioFormat::Wav => write!(f, "WAV"),
            AudioFormat::Flac => write!(f, "FLAC"),
        }
    }
}

/// Effective transcode quality handed to yt-dlp
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioQuality {
    /// Bitrate token such as `320k` (lossy formats only)
    Bitrate(String),
    /// Best available quality; the only setting for lossless formats
    Best,
}

impl AudioQuality {
    /// Value for yt-dlp's `--audio-quality` (0 is best)
    pub fn as_arg(&self) -> &str {
        match self {
            AudioQuality::Bitrate(token) => token,
            AudioQuality::Best => "0",
        }
    }
}

impl std::fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioQuality::Bitrate(token) => write!(f, "{}", token),
            AudioQuality::Best => write!(f, "best"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSettings {
    pub format: AudioFormat,
    pub quality: AudioQuality,
}

impl AudioSettings {
    /// Resolve a user-supplied quality token against the target format.
    ///
    /// Lossless formats ignore the token entirely.
    pub fn new(format: AudioFormat, quality: &str) -> Result<Self, ConfigError> {
        let token = quality.trim();

        let quality = if format.is_lossless() || token.eq_ignore_ascii_case("best") {
            AudioQuality::Best
        } else if bitrate_pattern().is_match(token) {
            AudioQuality::Bitrate(token.to_string())
        } else {
            return Err(ConfigError::InvalidValue(format!(
                "invalid audio quality '{}' (expected a bitrate such as 320k)",
                quality
            )));
        };

        Ok(Self { format, quality })
    }
}

fn bitrate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+)?[kK]?$").expect("valid bitrate regex"))
}
