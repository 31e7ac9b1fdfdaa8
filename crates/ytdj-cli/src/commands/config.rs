use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use ytdj_core::config::Config;

pub fn run(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = Config::load(config_path)?;

    println!("ytdj configuration\n");

    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("{}", rendered.trim_end());

    // Unset tool paths are omitted from the TOML above
    if config.paths.yt_dlp.is_none() {
        println!("# paths.yt_dlp = (auto-detect)");
    }
    if config.paths.ffmpeg.is_none() {
        println!("# paths.ffmpeg = (auto-detect)");
    }
    if config.paths.ytdj.is_none() {
        println!("# paths.ytdj = (auto-detect)");
    }

    println!("\nConfig file locations (in priority order):");
    println!("  1. Environment variables (YTDJ_*, nested keys joined with __)");
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    if let Some(default_file) = Config::default_file() {
        println!("  3. {}", default_file.display());
    }

    Ok(ExitCode::SUCCESS)
}
