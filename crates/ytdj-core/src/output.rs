//! Output directory layout and yt-dlp filename templates

use std::path::{Path, PathBuf};

const SINGLE_TEMPLATE: &str = "%(uploader)s - %(title)s.%(ext)s";
const COLLECTION_TEMPLATE: &str = "%(playlist_index)02d - %(title)s.%(ext)s";
const UNKNOWN_COLLECTION: &str = "Unknown Playlist";

/// Where yt-dlp writes the files for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLocation {
    /// `<dir>/<uploader> - <title>.<ext>`
    Single { directory: PathBuf },
    /// `<dir>/<collection>/<NN> - <title>.<ext>`
    Collection { directory: PathBuf },
}

impl OutputLocation {
    pub fn single(output_dir: &Path) -> Self {
        OutputLocation::Single {
            directory: output_dir.to_path_buf(),
        }
    }

    /// Per-playlist subdirectory named after the sanitized playlist title
    pub fn collection(output_dir: &Path, title: &str) -> Self {
        let mut name = sanitize_filename(title);
        if name.is_empty() || name.chars().all(|c| c == '.') {
            name = UNKNOWN_COLLECTION.to_string();
        }

        OutputLocation::Collection {
            directory: output_dir.join(name),
        }
    }

    pub fn directory(&self) -> &Path {
        match self {
            OutputLocation::Single { directory } | OutputLocation::Collection { directory } => {
                directory
            }
        }
    }

    /// Filename template relative to [`Self::directory`]
    pub fn template(&self) -> &'static str {
        match self {
            OutputLocation::Single { .. } => SINGLE_TEMPLATE,
            OutputLocation::Collection { .. } => COLLECTION_TEMPLATE,
        }
    }
}

/// Sanitize filename for filesystem.
///
/// Replaces `< > : " / \ | ? *` with `_`, then trims leading and trailing
/// whitespace. A name left empty is returned empty.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
