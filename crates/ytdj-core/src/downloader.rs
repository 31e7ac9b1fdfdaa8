//! YouTube audio downloader using yt-dlp

use crate::audio::AudioSettings;
use crate::error::DownloadError;
use crate::output::OutputLocation;
use crate::toolchain::Toolchain;
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Source stream selection: best audio-only stream, else best overall
const SOURCE_FORMAT: &str = "bestaudio/best";

#[derive(Debug, Clone, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default = "unknown")]
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

impl VideoMetadata {
    pub fn uploader_or_unknown(&self) -> &str {
        self.uploader.as_deref().unwrap_or("Unknown")
    }
}

/// Format seconds as `m:ss`
pub fn format_duration(seconds: Option<f64>) -> String {
    let total = seconds.unwrap_or(0.0).max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Extraction backend used by the batch orchestrator
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch metadata for a single video without downloading it
    async fn probe_single(&self, url: &str) -> Result<VideoMetadata, DownloadError>;

    /// Fetch the playlist title and entry list without downloading
    async fn probe_collection(&self, url: &str) -> Result<PlaylistMetadata, DownloadError>;

    /// Download and transcode everything the URL addresses into `location`
    async fn fetch(
        &self,
        url: &str,
        location: &OutputLocation,
        settings: &AudioSettings,
    ) -> Result<(), DownloadError>;
}

#[derive(Debug)]
pub struct YtDlp {
    yt_dlp_path: PathBuf,
    ffmpeg_path: PathBuf,
}

impl YtDlp {
    pub fn new(toolchain: &Toolchain) -> Self {
        Self {
            yt_dlp_path: toolchain.yt_dlp.clone(),
            ffmpeg_path: toolchain.ffmpeg.clone(),
        }
    }

    async fn dump_json(&self, url: &str, extra: &[&str]) -> Result<String, DownloadError> {
        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-single-json", "--no-warnings"])
            .args(extra)
            .arg(url)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_failure(&stderr, url, output.status.code()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn probe_single(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        let json = self.dump_json(url, &["--no-download", "--no-playlist"]).await?;
        let metadata: VideoMetadata =
            serde_json::from_str(&json).map_err(|e| DownloadError::MetadataParse(e.to_string()))?;

        debug!("Probed: {} ({})", metadata.title, metadata.id);
        Ok(metadata)
    }

    async fn probe_collection(&self, url: &str) -> Result<PlaylistMetadata, DownloadError> {
        let json = self.dump_json(url, &["--flat-playlist", "--yes-playlist"]).await?;
        let metadata: PlaylistMetadata =
            serde_json::from_str(&json).map_err(|e| DownloadError::MetadataParse(e.to_string()))?;

        debug!(
            "Probed playlist: {:?} ({}, {} entries)",
            metadata.title,
            metadata.id,
            metadata.entries.len()
        );
        Ok(metadata)
    }

    async fn fetch(
        &self,
        url: &str,
        location: &OutputLocation,
        settings: &AudioSettings,
    ) -> Result<(), DownloadError> {
        info!("Downloading {} as {} ({})", url, settings.format, settings.quality);

        let args = fetch_args(url, location, settings, Some(&self.ffmpeg_path));
        debug!("yt-dlp args: {:?}", args);

        // Inherit stdio so yt-dlp's progress lines reach our stdout in order
        let status = Command::new(&self.yt_dlp_path)
            .args(&args)
            .kill_on_drop(true)
            .status()
            .await?;

        if !status.success() {
            return Err(DownloadError::YtDlpFailed(status.code()));
        }

        Ok(())
    }
}

/// yt-dlp arguments for downloading `url` into `location` at `settings`
pub fn fetch_args(
    url: &str,
    location: &OutputLocation,
    settings: &AudioSettings,
    ffmpeg: Option<&std::path::Path>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-f".into(),
        SOURCE_FORMAT.into(),
        // Extract audio and transcode with ffmpeg
        "--extract-audio".into(),
        "--audio-format".into(),
        settings.format.extension().into(),
        "--audio-quality".into(),
        settings.quality.as_arg().into(),
        // One progress update per line for line-oriented consumers
        "--newline".into(),
        "--paths".into(),
        location.directory().as_os_str().to_os_string(),
        "--output".into(),
        location.template().into(),
    ];

    if let Some(ffmpeg) = ffmpeg {
        args.push("--ffmpeg-location".into());
        args.push(ffmpeg.as_os_str().to_os_string());
    }

    args.push(match location {
        OutputLocation::Single { .. } => "--no-playlist".into(),
        OutputLocation::Collection { .. } => "--yes-playlist".into(),
    });

    args.push(url.into());
    args
}

fn classify_failure(stderr: &str, url: &str, code: Option<i32>) -> DownloadError {
    if stderr.contains("Video unavailable") || stderr.contains("Private video") {
        return DownloadError::VideoUnavailable(url.to_string());
    }
    if stderr.contains("is not a valid URL") || stderr.contains("Unsupported URL") {
        return DownloadError::InvalidUrl(url.to_string());
    }
    DownloadError::YtDlpFailed(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioFormat, AudioQuality};
    use std::path::Path;

    fn arg_after<'a>(args: &'a [OsString], flag: &str) -> Option<&'a OsString> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
    }

    #[test]
    fn test_mp3_args_carry_bitrate() {
        let settings = AudioSettings::new(AudioFormat::Mp3, "256k").unwrap();
        let location = OutputLocation::single(Path::new("downloads"));
        let args = fetch_args("https://youtu.be/abc", &location, &settings, None);

        assert_eq!(arg_after(&args, "-f").unwrap(), "bestaudio/best");
        assert_eq!(arg_after(&args, "--audio-format").unwrap(), "mp3");
        assert_eq!(arg_after(&args, "--audio-quality").unwrap(), "256k");
        assert!(args.iter().any(|a| a == "--no-playlist"));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn test_lossless_args_use_best_quality() {
        let settings = AudioSettings::new(AudioFormat::Wav, "320k").unwrap();
        assert_eq!(settings.quality, AudioQuality::Best);

        let location = OutputLocation::single(Path::new("downloads"));
        let args = fetch_args("https://youtu.be/abc", &location, &settings, None);

        assert_eq!(arg_after(&args, "--audio-format").unwrap(), "wav");
        assert_eq!(arg_after(&args, "--audio-quality").unwrap(), "0");
        assert!(!args.iter().any(|a| a == "320k"));
    }

    #[test]
    fn test_single_output_template() {
        let settings = AudioSettings::new(AudioFormat::Flac, "best").unwrap();
        let location = OutputLocation::single(Path::new("downloads"));
        let args = fetch_args("https://youtu.be/abc", &location, &settings, None);

        assert_eq!(arg_after(&args, "--paths").unwrap(), "downloads");
        assert_eq!(
            arg_after(&args, "--output").unwrap(),
            "%(uploader)s - %(title)s.%(ext)s"
        );
    }

    #[test]
    fn test_collection_output_template() {
        let settings = AudioSettings::new(AudioFormat::Mp3, "320k").unwrap();
        let location = OutputLocation::collection(Path::new("downloads"), "My Mix");
        let args = fetch_args(
            "https://youtu.be/abc?list=PL1",
            &location,
            &settings,
            Some(Path::new("/usr/bin/ffmpeg")),
        );

        assert_eq!(
            arg_after(&args, "--paths").unwrap(),
            Path::new("downloads").join("My Mix").as_os_str()
        );
        assert_eq!(
            arg_after(&args, "--output").unwrap(),
            "%(playlist_index)02d - %(title)s.%(ext)s"
        );
        assert_eq!(arg_after(&args, "--ffmpeg-location").unwrap(), "/usr/bin/ffmpeg");
        assert!(args.iter().any(|a| a == "--yes-playlist"));
    }

    #[test]
    fn test_classify_failure() {
        let url = "https://youtu.be/abc";
        assert!(matches!(
            classify_failure("ERROR: [youtube] abc: Video unavailable", url, Some(1)),
            DownloadError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure("ERROR: 'x' is not a valid URL", url, Some(1)),
            DownloadError::InvalidUrl(_)
        ));
        assert!(matches!(
            classify_failure("ERROR: something else", url, Some(2)),
            DownloadError::YtDlpFailed(Some(2))
        ));
    }

    #[test]
    fn test_metadata_parsing() {
        let json = r#"{"id": "abc", "title": "Track", "uploader": "Artist", "duration": 185.0, "ext": "webm"}"#;
        let metadata: VideoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.title, "Track");
        assert_eq!(metadata.uploader_or_unknown(), "Artist");
        assert_eq!(format_duration(metadata.duration), "3:05");

        let bare: VideoMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.title, "Unknown");
        assert_eq!(bare.uploader_or_unknown(), "Unknown");
        assert_eq!(format_duration(bare.duration), "0:00");
    }

    #[test]
    fn test_playlist_parsing() {
        let json = r#"{"id": "PL1", "title": "Mix", "entries": [{"id": "a", "title": "One"}, {"id": "b"}]}"#;
        let metadata: PlaylistMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Mix"));
        assert_eq!(metadata.entries.len(), 2);
    }
}

#[cfg(all(test, unix))]
mod process_tests {
    use super::*;
    use crate::audio::AudioFormat;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// A yt-dlp stand-in running `body` as a shell script
    fn fake_yt_dlp(dir: &TempDir, body: &str) -> YtDlp {
        let script = dir.path().join("yt-dlp");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        YtDlp::new(&Toolchain {
            yt_dlp: script,
            ffmpeg: PathBuf::from("/usr/bin/ffmpeg"),
        })
    }

    #[tokio::test]
    async fn test_unavailable_video_from_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_yt_dlp(
            &dir,
            "echo 'ERROR: [youtube] abc: Video unavailable' >&2; exit 1",
        );

        let err = yt_dlp.probe_single("https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(err, DownloadError::VideoUnavailable(url) if url == "https://youtu.be/abc"));
    }

    #[tokio::test]
    async fn test_malformed_metadata_json() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_yt_dlp(&dir, "echo 'not json'");

        let err = yt_dlp.probe_single("https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(err, DownloadError::MetadataParse(_)));
    }

    #[tokio::test]
    async fn test_single_metadata_from_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_yt_dlp(
            &dir,
            r#"echo '{"id": "abc", "title": "Track", "uploader": "Artist", "duration": 61}'"#,
        );

        let metadata = yt_dlp.probe_single("https://youtu.be/abc").await.unwrap();
        assert_eq!(metadata.title, "Track");
        assert_eq!(metadata.uploader_or_unknown(), "Artist");
        assert_eq!(format_duration(metadata.duration), "1:01");
    }

    #[tokio::test]
    async fn test_playlist_metadata_from_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_yt_dlp(
            &dir,
            r#"echo '{"id": "PL1", "title": "Mix", "entries": [{"id": "a"}, {"id": "b"}]}'"#,
        );

        let metadata = yt_dlp
            .probe_collection("https://youtube.com/playlist?list=PL1")
            .await
            .unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Mix"));
        assert_eq!(metadata.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_carries_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_yt_dlp(&dir, "exit 7");
        let settings = AudioSettings::new(AudioFormat::Mp3, "320k").unwrap();
        let location = OutputLocation::single(dir.path());

        let err = yt_dlp
            .fetch("https://youtu.be/abc", &location, &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::YtDlpFailed(Some(7))));
    }

    #[tokio::test]
    async fn test_fetch_passes_transcode_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("args.txt");
        let yt_dlp = fake_yt_dlp(
            &dir,
            &format!("printf '%s\\n' \"$@\" > '{}'", record.display()),
        );
        let settings = AudioSettings::new(AudioFormat::Flac, "best").unwrap();
        let location = OutputLocation::single(dir.path());

        yt_dlp
            .fetch("https://youtu.be/abc", &location, &settings)
            .await
            .unwrap();

        let recorded = std::fs::read_to_string(&record).unwrap();
        let args: Vec<&str> = recorded.lines().collect();
        let after = |flag: &str| {
            args.iter()
                .position(|a| *a == flag)
                .and_then(|i| args.get(i + 1))
                .copied()
        };
        assert_eq!(after("--audio-format"), Some("flac"));
        assert_eq!(after("--audio-quality"), Some("0"));
        assert_eq!(after("--ffmpeg-location"), Some("/usr/bin/ffmpeg"));
        assert_eq!(after("--paths"), dir.path().to_str());
        assert_eq!(args.last().copied(), Some("https://youtu.be/abc"));
    }
}
