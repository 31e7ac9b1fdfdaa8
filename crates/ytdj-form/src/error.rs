//! Error types for the download launcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Child process has no stdout pipe")]
    NoStdout,

    #[error("Download cancelled")]
    Cancelled,

    #[error("Output reader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
