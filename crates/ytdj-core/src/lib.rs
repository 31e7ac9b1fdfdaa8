//! ytdj-core: URL classification, output templating and batch orchestration
//! for downloading YouTube audio through yt-dlp and ffmpeg

pub mod audio;
pub mod batch;
pub mod classify;
pub mod config;
pub mod downloader;
pub mod error;
pub mod output;
pub mod toolchain;

pub use config::Config;
pub use error::{Result, YtDjError};
