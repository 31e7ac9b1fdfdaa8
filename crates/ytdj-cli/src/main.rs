mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "ytdj=warn,ytdj_core=warn",
        1 => "ytdj=info,ytdj_core=info",
        2 => "ytdj=debug,ytdj_core=debug",
        _ => "trace",
    };

    // stdout carries progress for the form front-end, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Some(Commands::Doctor) => commands::doctor::run(cli.config.as_deref()).await,
        Some(Commands::Config) => commands::config::run(cli.config.as_deref()),
        None => {
            let options = commands::download::DownloadOptions {
                output: cli.output,
                format: cli.format.map(Into::into),
                quality: cli.quality,
            };
            commands::download::run(&cli.urls, &options, cli.config.as_deref()).await
        }
    }
}
