//! URL classification: single video vs. playlist

use url::{form_urlencoded, Url};

/// Query parameter that marks a playlist URL
const COLLECTION_PARAM: &str = "list";

const YOUTUBE_PREFIXES: &[&str] = &[
    "https://www.youtube.com/",
    "https://youtube.com/",
    "https://youtu.be/",
    "https://music.youtube",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Single,
    Collection,
}

impl std::fmt::Display for UrlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlKind::Single => write!(f, "video"),
            UrlKind::Collection => write!(f, "playlist"),
        }
    }
}

/// Decide whether a URL addresses a playlist, without touching the network
pub fn classify(url: &str) -> UrlKind {
    let has_list = match Url::parse(url) {
        Ok(parsed) => has_collection_param(parsed.query_pairs()),
        // Scheme-less input like "youtu.be/abc?list=PL1"
        Err(_) => url
            .split_once('?')
            .map(|(_, query)| {
                let query = query.split('#').next().unwrap_or_default();
                has_collection_param(form_urlencoded::parse(query.as_bytes()))
            })
            .unwrap_or(false),
    };

    if has_list {
        UrlKind::Collection
    } else {
        UrlKind::Single
    }
}

fn has_collection_param<'a>(
    mut pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
) -> bool {
    pairs.any(|(key, value)| key == COLLECTION_PARAM && !value.is_empty())
}

/// Surface-level check that a string looks like a YouTube URL
pub fn is_youtube_url(url: &str) -> bool {
    YOUTUBE_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}
