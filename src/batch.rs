use crate::artifact::CompressionOutcome;
use crate::backend::Backends;
use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::processing::{BatchSettings, CompressionOrchestrator};
use crate::progress::{BatchProgressFn, CompletionFn, ProgressFn};
use crate::source::SourceImage;
use futures::stream::{self, StreamExt};
use glob::glob;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use walkdir::WalkDir;

/// Runs the orchestrator over a set of images.
///
/// Images are processed concurrently up to the configured limit. Each one is
/// isolated: a failure yields a failed outcome for that image and nothing else.
/// Outcomes come back in input order, whatever order they finish in.
#[derive(Clone)]
pub struct BatchRunner {
    orchestrator: CompressionOrchestrator,
    concurrency: usize,
    progress: Option<BatchProgressFn>,
    on_complete: Option<CompletionFn>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(Backends::default())
    }
}

impl BatchRunner {
    pub fn new(backends: Backends) -> Self {
        Self {
            orchestrator: CompressionOrchestrator::new(backends),
            concurrency: num_cpus::get().max(1),
            progress: None,
            on_complete: None,
        }
    }

    /// Maximum number of images in flight; 1 means strictly sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Receives `(input index, percent)` from the lossy path.
    pub fn with_progress(mut self, progress: BatchProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_completion(mut self, on_complete: CompletionFn) -> Self {
        self.on_complete = Some(on_complete);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run(&self, images: &[SourceImage], settings: BatchSettings) -> Vec<CompressionOutcome> {
        info!(
            images = images.len(),
            quality = settings.quality.value(),
            format = %settings.format,
            concurrency = self.concurrency,
            "starting batch"
        );
        let start_time = Instant::now();

        let orchestrator = &self.orchestrator;
        let batch_progress = self.progress.clone();
        let on_complete = self.on_complete.clone();
        let outcomes: Vec<CompressionOutcome> = stream::iter(images.iter().enumerate())
            .map(|(index, image)| {
                let progress = batch_progress.as_ref().map(|sink| {
                    let sink = Arc::clone(sink);
                    Arc::new(move |percent| sink(index, percent)) as ProgressFn
                });
                let on_complete = on_complete.clone();
                async move {
                    let outcome = orchestrator.compress(index, image, settings, progress).await;
                    if let Some(callback) = &on_complete {
                        callback(index, &outcome);
                    }
                    outcome
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed = ?start_time.elapsed(),
            "batch complete"
        );

        outcomes
    }
}

/// Compresses every image with the default backends.
///
/// Quality is validated before any image is touched; an out-of-range value
/// aborts the whole batch. Everything after that is reported per image.
pub async fn run_batch(
    images: &[SourceImage],
    quality: u8,
    format: OutputFormat,
) -> Result<Vec<CompressionOutcome>> {
    let settings = BatchSettings::new(quality, format)?;
    Ok(BatchRunner::default().run(images, settings).await)
}

/// Totals over a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total_before: usize,
    pub total_after: usize,
}

impl BatchSummary {
    /// Sizes only count successful images, so the ratio compares like with like.
    pub fn from_outcomes(outcomes: &[CompressionOutcome]) -> Self {
        outcomes
            .iter()
            .fold(BatchSummary::default(), |mut summary, outcome| {
                match outcome {
                    CompressionOutcome::Success(artifact) => {
                        summary.succeeded += 1;
                        summary.total_before += artifact.original_size();
                        summary.total_after += artifact.size();
                    }
                    CompressionOutcome::Failure(_) => summary.failed += 1,
                }
                summary
            })
    }
}

/// Collects image files from a single file, a directory or a glob pattern.
/// Hidden entries are skipped.
pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        image_files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_image_file(path) {
                image_files.push(path.to_path_buf());
            }
        }
    } else if let Ok(glob_pattern) = glob(input) {
        for entry in glob_pattern.flatten() {
            if entry.is_file() && is_image_file(&entry) {
                image_files.push(entry);
            }
        }
    } else {
        return Err(CompressionError::NoImageFilesFound(input.to_string()));
    }

    Ok(image_files)
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
