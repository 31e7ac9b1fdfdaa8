use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ytdj_core::{
    audio::{AudioFormat, AudioSettings},
    batch::{BatchEvent, BatchOrchestrator, BatchSettings},
    classify::UrlKind,
    config::Config,
    downloader::{format_duration, YtDlp},
    error::DependencyError,
    toolchain::Toolchain,
};

/// Command-line overrides; unset fields fall back to the config defaults
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub output: Option<PathBuf>,
    pub format: Option<AudioFormat>,
    pub quality: Option<String>,
}

pub async fn run(
    urls: &[String],
    options: &DownloadOptions,
    config_path: Option<&Path>,
) -> Result<ExitCode> {
    let config = Config::load(config_path)?;

    let toolchain = match Toolchain::detect(&config) {
        Ok(toolchain) => toolchain,
        Err(e) => {
            for line in missing_dependency_lines(&e) {
                println!("{}", line);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let settings = batch_settings(options, &config)?;
    let orchestrator = BatchOrchestrator::new(settings, YtDlp::new(&toolchain));

    orchestrator
        .run(urls, |event| render(&event))
        .await
        .context("Failed to prepare output directory")?;

    Ok(ExitCode::SUCCESS)
}

/// The error and its install instructions, as printed before exiting
fn missing_dependency_lines(error: &DependencyError) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];
    lines.extend(error.install_hint().lines().map(str::to_string));
    lines
}

fn batch_settings(options: &DownloadOptions, config: &Config) -> Result<BatchSettings> {
    let format = options.format.unwrap_or(config.output.default_format);
    let quality = options
        .quality
        .as_deref()
        .unwrap_or(&config.output.default_quality);

    Ok(BatchSettings {
        output_dir: options
            .output
            .clone()
            .unwrap_or_else(|| config.output.default_directory.clone()),
        audio: AudioSettings::new(format, quality)?,
    })
}

fn render(event: &BatchEvent) {
    for line in render_lines(event) {
        println!("{}", line);
    }
}

fn render_lines(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::ItemStarted { index, total, url } => {
            vec![String::new(), format!("[{}/{}] Processing: {}", index, total, url)]
        }
        BatchEvent::SingleResolved {
            title,
            uploader,
            duration,
        } => vec![
            format!("Title: {}", title),
            format!("Uploader: {}", uploader),
            format!("Duration: {}", format_duration(*duration)),
            "Downloading...".to_string(),
        ],
        BatchEvent::CollectionResolved { title, entries, .. } => vec![
            format!("Playlist: {}", title),
            format!("Found {} videos", entries),
            "-".repeat(50),
        ],
        BatchEvent::ItemSucceeded { kind, title, .. } => match kind {
            UrlKind::Single => vec![format!(
                "✓ Successfully downloaded: {}",
                title.as_deref().unwrap_or("Unknown")
            )],
            UrlKind::Collection => vec!["✓ Playlist download complete!".to_string()],
        },
        BatchEvent::ItemFailed { kind, url, error, .. } => match kind {
            UrlKind::Single => vec![format!("✗ Error downloading {}: {}", url, error)],
            UrlKind::Collection => vec![format!("✗ Error downloading playlist {}: {}", url, error)],
        },
        BatchEvent::Finished {
            succeeded,
            total,
            output_dir,
        } => vec![
            String::new(),
            "=".repeat(50),
            format!("Download Summary: {}/{} successful", succeeded, total),
            format!("Files saved to: {}", output_dir.display()),
        ],
    }
}
