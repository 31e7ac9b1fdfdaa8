use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use ytdj_core::{config::Config, error::DependencyError, toolchain::tool_version};

pub async fn run(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = Config::load(config_path)?;

    println!("ytdj dependency check\n");

    let mut all_ok = true;

    print!("yt-dlp:  ");
    all_ok &= report(config.yt_dlp_path(), "--version", |v| v.to_string()).await;

    print!("ffmpeg:  ");
    // "ffmpeg version 6.1.1 Copyright ..." -> "6.1.1"
    all_ok &= report(config.ffmpeg_path(), "-version", |v| {
        v.split_whitespace().nth(2).unwrap_or("unknown").to_string()
    })
    .await;

    println!();
    if all_ok {
        println!("All dependencies OK!");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
        Ok(ExitCode::FAILURE)
    }
}

async fn report(
    path: Result<std::path::PathBuf, DependencyError>,
    version_flag: &str,
    short_version: impl Fn(&str) -> String,
) -> bool {
    match path {
        Ok(path) => match tool_version(&path, version_flag).await {
            Some(version) => {
                println!("OK ({}, {})", short_version(&version), path.display());
                true
            }
            None => {
                println!("FOUND but failed to get version ({})", path.display());
                false
            }
        },
        Err(e) => {
            println!("NOT FOUND");
            for line in e.install_hint().lines() {
                println!("         {}", line);
            }
            false
        }
    }
}
