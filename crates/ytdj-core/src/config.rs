//! Configuration management for ytdj

use crate::audio::AudioFormat;
use crate::error::{ConfigError, DependencyError};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
    /// Path to the ytdj binary launched by the form (auto-detected if not set)
    pub ytdj: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: AudioFormat,
    /// Default MP3 bitrate
    pub default_quality: String,
    /// Default output directory
    pub default_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            output: OutputConfig {
                default_format: AudioFormat::Mp3,
                default_quality: "320k".to_string(),
                default_directory: PathBuf::from("downloads"),
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(default_config) = Self::default_file() {
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // YTDJ_OUTPUT__DEFAULT_FORMAT=flac
        figment = figment.merge(Env::prefixed("YTDJ_").split("__"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// User-level config file location
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ytdj/config.toml"))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, DependencyError> {
        resolve_tool(self.paths.yt_dlp.as_deref(), "yt-dlp")
            .ok_or(DependencyError::YtDlpNotFound)
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, DependencyError> {
        resolve_tool(self.paths.ffmpeg.as_deref(), "ffmpeg")
            .ok_or(DependencyError::FfmpegNotFound)
    }

    /// Get the ytdj CLI path, preferring a binary next to the running executable
    pub fn ytdj_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ytdj {
            return Ok(path.clone());
        }

        let sibling = std::env::current_exe().ok().and_then(|exe| {
            exe.parent()
                .map(|dir| dir.join(format!("ytdj{}", std::env::consts::EXE_SUFFIX)))
        });
        if let Some(path) = sibling.filter(|p| p.exists()) {
            return Ok(path);
        }

        which::which("ytdj")
            .map_err(|_| ConfigError::InvalidValue("ytdj not found in PATH".to_string()))
    }
}

/// A configured path wins only if it exists; otherwise search PATH
fn resolve_tool(configured: Option<&Path>, name: &str) -> Option<PathBuf> {
    match configured {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(_) => None,
        None => which::which(name).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.default_format, AudioFormat::Mp3);
        assert_eq!(config.output.default_quality, "320k");
        assert_eq!(config.output.default_directory, PathBuf::from("downloads"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\ndefault_format = \"flac\"\ndefault_directory = \"/tmp/crates\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.output.default_format, AudioFormat::Flac);
        assert_eq!(config.output.default_directory, PathBuf::from("/tmp/crates"));
        assert_eq!(config.output.default_quality, "320k");
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::load(Some(Path::new("/nonexistent/ytdj.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn test_invalid_format_in_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\ndefault_format = \"ogg\"").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_configured_tool_must_exist() {
        let mut config = Config::default();
        config.paths.ffmpeg = Some(PathBuf::from("/nonexistent/ffmpeg"));
        config.paths.yt_dlp = Some(PathBuf::from("/nonexistent/yt-dlp"));

        assert!(matches!(config.ffmpeg_path(), Err(DependencyError::FfmpegNotFound)));
        assert!(matches!(config.yt_dlp_path(), Err(DependencyError::YtDlpNotFound)));
    }

    #[test]
    fn test_configured_tool_used_when_present() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.paths.ffmpeg = Some(file.path().to_path_buf());

        assert_eq!(config.ffmpeg_path().unwrap(), file.path());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(rendered.contains("default_format = \"mp3\""));
    }

    #[test]
    fn test_env_overrides_tool_paths() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("YTDJ_PATHS__FFMPEG", "/opt/ffmpeg/bin/ffmpeg");
            jail.set_env("YTDJ_OUTPUT__DEFAULT_DIRECTORY", "/srv/music");

            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.paths.ffmpeg, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
            assert_eq!(config.output.default_directory, PathBuf::from("/srv/music"));
            Ok(())
        });
    }
}
