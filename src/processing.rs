use crate::artifact::{
    suggested_file_name, CompressionFailure, CompressionOutcome, EncodedArtifact, ImageIdentity,
};
use crate::backend::Backends;
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::lossless::LosslessStrategy;
use crate::lossy::{LossyRequest, LossyStrategy, SizeCaps};
use crate::progress::{ProgressFn, ProgressRelay};
use crate::quality::QualityRequest;
use crate::selector::{self, Strategy};
use crate::source::SourceImage;
use tracing::{debug, warn};

/// Settings for a batch, captured once when the batch starts.
///
/// This is a plain `Copy` value: every image in a batch sees the same settings
/// even if whatever they were read from changes while the batch runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSettings {
    pub quality: QualityRequest,
    pub format: OutputFormat,
    pub caps: SizeCaps,
    pub use_web_worker: bool,
}

impl BatchSettings {
    pub fn new(quality: u8, format: OutputFormat) -> Result<Self> {
        Ok(Self {
            quality: QualityRequest::new(quality)?,
            format,
            caps: SizeCaps::default(),
            use_web_worker: true,
        })
    }

    /// Builds settings from a raw format name, as typed by a user.
    pub fn parse(quality: u8, format: &str) -> Result<Self> {
        Self::new(quality, format.parse()?)
    }

    pub fn with_max_size_mb(mut self, max_size_mb: f64) -> Result<Self> {
        if !max_size_mb.is_finite() || max_size_mb <= 0.0 {
            return Err(CompressionError::InvalidConfiguration(format!(
                "max size must be a positive number of MB, got {}",
                max_size_mb
            )));
        }
        self.caps.max_size_mb = Some(max_size_mb);
        Ok(self)
    }

    pub fn with_max_width_or_height(mut self, max: u32) -> Result<Self> {
        if max == 0 {
            return Err(CompressionError::InvalidConfiguration(
                "max width or height must be at least 1 pixel".to_string(),
            ));
        }
        self.caps.max_width_or_height = Some(max);
        Ok(self)
    }

    pub fn with_web_worker(mut self, use_web_worker: bool) -> Self {
        self.use_web_worker = use_web_worker;
        self
    }
}

/// Drives one image through quality mapping, strategy selection and encoding.
#[derive(Clone)]
pub struct CompressionOrchestrator {
    lossless: LosslessStrategy,
    lossy: LossyStrategy,
}

impl Default for CompressionOrchestrator {
    fn default() -> Self {
        Self::new(Backends::default())
    }
}

impl CompressionOrchestrator {
    pub fn new(backends: Backends) -> Self {
        Self {
            lossless: LosslessStrategy::new(backends.decoder, backends.lossless),
            lossy: LossyStrategy::new(backends.lossy),
        }
    }

    /// Compresses one image. Errors are turned into a failed outcome tagged
    /// with the image identity; they never escape to the caller.
    pub async fn compress(
        &self,
        index: usize,
        image: &SourceImage,
        settings: BatchSettings,
        progress: Option<ProgressFn>,
    ) -> CompressionOutcome {
        match self.try_compress(image, settings, progress).await {
            Ok(artifact) => {
                debug!(
                    index,
                    image = image.name(),
                    original = image.size(),
                    optimized = artifact.size(),
                    "image optimized"
                );
                CompressionOutcome::Success(artifact)
            }
            Err(e) => {
                warn!(index, image = image.name(), kind = %e.kind(), "compression failed: {}", e);
                CompressionOutcome::Failure(CompressionFailure {
                    image: ImageIdentity {
                        index,
                        name: image.name().to_string(),
                    },
                    kind: e.kind(),
                })
            }
        }
    }

    /// Like [`compress`](Self::compress) but keeps the underlying error.
    pub async fn try_compress(
        &self,
        image: &SourceImage,
        settings: BatchSettings,
        progress: Option<ProgressFn>,
    ) -> Result<EncodedArtifact> {
        let output = match selector::select(settings.format) {
            Strategy::Lossless => {
                let level = settings.quality.lossless_level();
                self.lossless.compress(image, level).await?
            }
            Strategy::Lossy(format) => {
                let request = LossyRequest {
                    quality: settings.quality.lossy_fraction(),
                    format,
                    caps: settings.caps,
                    use_web_worker: settings.use_web_worker,
                };
                self.lossy
                    .compress(image, request, ProgressRelay::new(progress))
                    .await?
            }
        };

        if output.bytes.is_empty() {
            return Err(CompressionError::Encode("encoder produced no output".to_string()));
        }

        let file_name = suggested_file_name(image.name(), output.format);
        Ok(EncodedArtifact::new(
            output.bytes,
            output.format,
            file_name,
            image.size(),
            output.level,
        ))
    }
}
