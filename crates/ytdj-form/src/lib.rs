//! Interactive download form for ytdj
//!
//! The form collects a format, a quality and a URL, then runs the `ytdj`
//! CLI as a child process and relays its output live.

mod error;
pub mod form;
pub mod launcher;

pub use error::LaunchError;
pub use form::{FormSubmission, ValidationError};
pub use launcher::{spawn, RunningDownload};
