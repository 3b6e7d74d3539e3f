use crate::backend::{LossyReencoder, ReencodeConfig};
use crate::error::{CompressionError, Result};
use crate::formats::LossyFormat;
use crate::progress::ProgressRelay;
use crate::selector::StrategyOutput;
use crate::source::SourceImage;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task;
use tracing::debug;

/// Optional output limits for lossy re-encoding. Both are off unless set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeCaps {
    pub max_size_mb: Option<f64>,
    pub max_width_or_height: Option<u32>,
}

/// What the lossy path is asked to produce for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossyRequest {
    pub quality: f32,
    pub format: LossyFormat,
    pub caps: SizeCaps,
    pub use_web_worker: bool,
}

impl LossyRequest {
    fn config(&self) -> ReencodeConfig {
        ReencodeConfig {
            initial_quality: self.quality,
            file_type: self.format,
            max_size_mb: self.caps.max_size_mb,
            max_width_or_height: self.caps.max_width_or_height,
            use_web_worker: self.use_web_worker,
        }
    }
}

/// JPEG/WebP strategy: hands the whole image to a lossy re-encoder.
#[derive(Clone)]
pub struct LossyStrategy {
    reencoder: Arc<dyn LossyReencoder>,
}

impl LossyStrategy {
    pub fn new(reencoder: Arc<dyn LossyReencoder>) -> Self {
        Self { reencoder }
    }

    pub async fn compress(
        &self,
        image: &SourceImage,
        request: LossyRequest,
        progress: ProgressRelay,
    ) -> Result<StrategyOutput> {
        let config = request.config();
        let progress = Arc::new(progress);

        let encoded = if config.use_web_worker {
            let reencoder = Arc::clone(&self.reencoder);
            let bytes = image.shared_bytes();
            let mime_hint = image.mime_type().to_string();
            let worker_progress = Arc::clone(&progress);
            task::spawn_blocking(move || {
                reencoder.reencode(&bytes, &mime_hint, &config, &worker_progress)
            })
            .await
            .map_err(|e| CompressionError::Encode(format!("lossy worker failed: {}", e)))??
        } else {
            let reencoder = self.reencoder.as_ref();
            panic::catch_unwind(AssertUnwindSafe(|| {
                reencoder.reencode(image.bytes(), image.mime_type(), &config, &progress)
            }))
            .map_err(|_| CompressionError::Encode("lossy backend panicked".to_string()))??
        };

        verify_container(&encoded, request.format)?;
        debug!(
            size = encoded.len(),
            mime = request.format.mime_type(),
            quality = request.quality,
            "lossy re-encode complete"
        );
        progress.finish();

        Ok(StrategyOutput {
            bytes: encoded,
            format: request.format.output_format(),
            level: None,
        })
    }
}

/// Rejects output that is not the container that was asked for.
fn verify_container(bytes: &[u8], expected: LossyFormat) -> Result<()> {
    let expected_format = expected.output_format().to_image_format();
    match image::guess_format(bytes) {
        Ok(actual) if actual == expected_format => Ok(()),
        Ok(actual) => Err(CompressionError::Encode(format!(
            "backend produced {:?}, expected {}",
            actual,
            expected.mime_type()
        ))),
        Err(_) => Err(CompressionError::Encode(format!(
            "backend output is not a valid {} container",
            expected.mime_type()
        ))),
    }
}
