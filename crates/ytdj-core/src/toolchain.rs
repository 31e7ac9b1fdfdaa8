//! Pre-flight detection of the external programs ytdj drives

use crate::error::DependencyError;
use crate::Config;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Resolved paths of yt-dlp and ffmpeg
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub yt_dlp: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Toolchain {
    /// Locate both tools. The transcoder is checked first so a missing
    /// ffmpeg is always the reported error when both are absent.
    pub fn detect(config: &Config) -> Result<Self, DependencyError> {
        let ffmpeg = config.ffmpeg_path()?;
        let yt_dlp = config.yt_dlp_path()?;

        debug!("Using ffmpeg at {}", ffmpeg.display());
        debug!("Using yt-dlp at {}", yt_dlp.display());

        Ok(Self { yt_dlp, ffmpeg })
    }
}

/// First line of `<tool> <flag>` output, if the tool runs at all
pub async fn tool_version(path: &Path, flag: &str) -> Option<String> {
    let output = Command::new(path).arg(flag).output().await.ok()?;
    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}
