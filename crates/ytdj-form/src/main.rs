use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ytdj_core::Config;
use ytdj_form::form::{child_env, FormSubmission, FORMAT_CHOICES, MP3_QUALITIES, TIPS};
use ytdj_form::{spawn, LaunchError};

#[derive(Parser)]
#[command(name = "ytdj-form")]
#[command(author, version, about = "Interactive YouTube audio downloader")]
struct Cli {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "ytdj_form=warn",
        1 => "ytdj_form=info",
        2 => "ytdj_form=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let ytdj = config
        .ytdj_path()
        .context("Could not find the ytdj binary; set paths.ytdj in the config")?;

    let theme = ColorfulTheme::default();

    println!("🎧 YouTube Downloader");
    println!("Download YouTube videos as high-quality audio files\n");
    println!("💡 Tips:");
    for tip in TIPS {
        println!("  - {}", tip);
    }
    println!();

    loop {
        let submission = prompt(&theme)?;

        let errors = submission.validate(&config);
        if errors.is_empty() {
            run_download(&ytdj, &submission, &config).await?;
        } else {
            for error in &errors {
                eprintln!("✗ {}", error);
            }
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Download another?")
            .default(true)
            .interact()?;
        if !again {
            return Ok(());
        }
        println!();
    }
}

fn prompt(theme: &ColorfulTheme) -> Result<FormSubmission> {
    let labels: Vec<&str> = FORMAT_CHOICES.iter().map(|(label, _)| *label).collect();
    let choice = Select::with_theme(theme)
        .with_prompt("Audio Format")
        .items(&labels)
        .default(0)
        .interact()?;
    let format = FORMAT_CHOICES[choice].1;

    let quality = if format.is_lossless() {
        println!("Lossless formats use best available quality");
        ""
    } else {
        let idx = Select::with_theme(theme)
            .with_prompt("MP3 Quality")
            .items(MP3_QUALITIES)
            .default(0)
            .interact()?;
        MP3_QUALITIES[idx]
    };

    let url: String = Input::with_theme(theme)
        .with_prompt("YouTube URL")
        .allow_empty(true)
        .interact_text()?;

    Ok(FormSubmission::new(format, quality, &url))
}

async fn run_download(ytdj: &Path, submission: &FormSubmission, config: &Config) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    pb.set_message("Processing download... (Ctrl-C to cancel)");
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut running = spawn(ytdj, &submission.download_args(), &child_env(config))?;

    loop {
        tokio::select! {
            line = running.lines.recv() => match line {
                Some(line) => pb.println(line),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                running.cancel();
                break;
            }
        }
    }

    match running.wait().await {
        Ok(status) if status.success() => {
            pb.finish_and_clear();
            println!("✓ Download completed successfully!");
        }
        Ok(status) => {
            pb.finish_and_clear();
            eprintln!("✗ An error occurred: ytdj exited with {}", status);
        }
        Err(LaunchError::Cancelled) => {
            pb.finish_and_clear();
            eprintln!("✗ Download cancelled");
        }
        Err(e) => {
            pb.abandon_with_message(format!("Failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
