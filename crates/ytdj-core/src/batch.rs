//! Sequential batch orchestration over a list of URLs

use crate::audio::AudioSettings;
use crate::classify::{classify, UrlKind};
use crate::downloader::Extractor;
use crate::error::{DownloadError, YtDjError};
use crate::output::OutputLocation;

use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Settings shared by every URL of one batch
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub output_dir: PathBuf,
    pub audio: AudioSettings,
}

/// Progress notifications, emitted in processing order
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    ItemStarted {
        index: usize,
        total: usize,
        url: String,
    },
    SingleResolved {
        title: String,
        uploader: String,
        duration: Option<f64>,
    },
    CollectionResolved {
        title: String,
        entries: usize,
        directory: PathBuf,
    },
    ItemSucceeded {
        index: usize,
        kind: UrlKind,
        title: Option<String>,
    },
    ItemFailed {
        index: usize,
        kind: UrlKind,
        url: String,
        error: String,
    },
    Finished {
        succeeded: usize,
        total: usize,
        output_dir: PathBuf,
    },
}

#[derive(Debug)]
pub enum DownloadOutcome {
    Downloaded { title: Option<String> },
    Failed(DownloadError),
}

#[derive(Debug)]
pub struct DownloadResult {
    pub url: String,
    pub kind: UrlKind,
    pub outcome: DownloadOutcome,
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DownloadOutcome::Downloaded { .. })
    }
}

#[derive(Debug)]
pub struct BatchSummary {
    pub results: Vec<DownloadResult>,
    /// Absolute output directory
    pub output_dir: PathBuf,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

pub struct BatchOrchestrator<E> {
    settings: BatchSettings,
    extractor: E,
}

impl<E: Extractor> BatchOrchestrator<E> {
    pub fn new(settings: BatchSettings, extractor: E) -> Self {
        Self { settings, extractor }
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Process every URL in order. Per-URL failures are recorded and the
    /// batch moves on; only failing to create the output directory aborts.
    pub async fn run<F>(&self, urls: &[String], mut on_event: F) -> Result<BatchSummary, YtDjError>
    where
        F: FnMut(BatchEvent),
    {
        tokio::fs::create_dir_all(&self.settings.output_dir).await?;
        let output_dir = tokio::fs::canonicalize(&self.settings.output_dir)
            .await
            .unwrap_or_else(|_| self.settings.output_dir.clone());

        let total = urls.len();
        let mut results = Vec::with_capacity(total);

        for (i, url) in urls.iter().enumerate() {
            let index = i + 1;
            on_event(BatchEvent::ItemStarted {
                index,
                total,
                url: url.clone(),
            });

            let kind = classify(url);
            info!("[{}/{}] Processing {}: {}", index, total, kind, url);

            let result = match kind {
                UrlKind::Single => self.download_single(url, &output_dir, &mut on_event).await,
                UrlKind::Collection => {
                    self.download_collection(url, &output_dir, &mut on_event).await
                }
            };

            let outcome = match result {
                Ok(title) => {
                    on_event(BatchEvent::ItemSucceeded {
                        index,
                        kind,
                        title: title.clone(),
                    });
                    DownloadOutcome::Downloaded { title }
                }
                Err(e) => {
                    error!("Error downloading {} {}: {}", kind, url, e);
                    on_event(BatchEvent::ItemFailed {
                        index,
                        kind,
                        url: url.clone(),
                        error: e.to_string(),
                    });
                    DownloadOutcome::Failed(e)
                }
            };

            results.push(DownloadResult {
                url: url.clone(),
                kind,
                outcome,
            });
        }

        let summary = BatchSummary { results, output_dir };
        info!("Batch complete: {}/{} successful", summary.succeeded(), summary.total());

        on_event(BatchEvent::Finished {
            succeeded: summary.succeeded(),
            total: summary.total(),
            output_dir: summary.output_dir.clone(),
        });

        Ok(summary)
    }

    async fn download_single<F>(
        &self,
        url: &str,
        output_dir: &Path,
        on_event: &mut F,
    ) -> Result<Option<String>, DownloadError>
    where
        F: FnMut(BatchEvent),
    {
        let metadata = self.extractor.probe_single(url).await?;
        on_event(BatchEvent::SingleResolved {
            title: metadata.title.clone(),
            uploader: metadata.uploader_or_unknown().to_string(),
            duration: metadata.duration,
        });

        let location = OutputLocation::single(output_dir);
        self.extractor
            .fetch(url, &location, &self.settings.audio)
            .await?;

        Ok(Some(metadata.title))
    }

    async fn download_collection<F>(
        &self,
        url: &str,
        output_dir: &Path,
        on_event: &mut F,
    ) -> Result<Option<String>, DownloadError>
    where
        F: FnMut(BatchEvent),
    {
        let metadata = self.extractor.probe_collection(url).await?;
        let title = metadata
            .title
            .clone()
            .unwrap_or_else(|| "Unknown Playlist".to_string());

        let location = OutputLocation::collection(output_dir, &title);
        tokio::fs::create_dir_all(location.directory()).await?;

        on_event(BatchEvent::CollectionResolved {
            title: title.clone(),
            entries: metadata.entries.len(),
            directory: location.directory().to_path_buf(),
        });

        self.extractor
            .fetch(url, &location, &self.settings.audio)
            .await?;

        Ok(Some(title))
    }
}
