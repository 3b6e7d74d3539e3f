use crate::backend::{ImageDecoder, LosslessEncoder};
use crate::constants::LOSSLESS_BIT_DEPTH;
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::selector::StrategyOutput;
use crate::source::SourceImage;
use image::GenericImageView;
use std::sync::Arc;
use tokio::task;
use tracing::debug;

/// PNG strategy: decode, flatten to RGBA8, re-encode losslessly at a level.
#[derive(Clone)]
pub struct LosslessStrategy {
    decoder: Arc<dyn ImageDecoder>,
    encoder: Arc<dyn LosslessEncoder>,
}

impl LosslessStrategy {
    pub fn new(decoder: Arc<dyn ImageDecoder>, encoder: Arc<dyn LosslessEncoder>) -> Self {
        Self { decoder, encoder }
    }

    /// Runs the re-encode on the blocking pool and returns the PNG bytes
    /// together with the level used.
    pub async fn compress(&self, image: &SourceImage, level: u8) -> Result<StrategyOutput> {
        let decoder = Arc::clone(&self.decoder);
        let encoder = Arc::clone(&self.encoder);
        let bytes = image.shared_bytes();
        let mime_hint = image.mime_type().to_string();

        let encoded = task::spawn_blocking(move || {
            reencode_lossless(decoder.as_ref(), encoder.as_ref(), &bytes, &mime_hint, level)
        })
        .await
        .map_err(|e| CompressionError::Encode(format!("lossless worker failed: {}", e)))??;

        Ok(StrategyOutput {
            bytes: encoded,
            format: OutputFormat::Png,
            level: Some(level),
        })
    }
}

/// Synchronous core of the lossless path.
///
/// The RGBA conversion is a pure format change: no quantisation and no palette,
/// so decoding the result yields exactly the buffer handed to the encoder.
pub fn reencode_lossless(
    decoder: &dyn ImageDecoder,
    encoder: &dyn LosslessEncoder,
    bytes: &[u8],
    mime_hint: &str,
    level: u8,
) -> Result<Vec<u8>> {
    let decoded = decoder.decode(bytes, mime_hint)?;
    let (width, height) = decoded.dimensions();
    let rgba = decoded.into_rgba8().into_raw();
    debug!(width, height, level, "decoded lossless source");

    encoder.encode(rgba, width, height, LOSSLESS_BIT_DEPTH, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ImageCrateDecoder, OxipngEncoder};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn strategy() -> LosslessStrategy {
        LosslessStrategy::new(Arc::new(ImageCrateDecoder), Arc::new(OxipngEncoder))
    }

    fn png_source(image: &RgbaImage, name: &str) -> SourceImage {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        SourceImage::new(name, "image/png", buffer.into_inner())
    }

    #[tokio::test]
    async fn test_red_square_round_trip() {
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let source = png_source(&red, "red.png");

        let output = strategy().compress(&source, 3).await.unwrap();
        assert_eq!(output.format, OutputFormat::Png);
        assert_eq!(output.level, Some(3));

        let decoded = image::load_from_memory_with_format(&output.bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgba8().as_raw(), red.as_raw());
    }

    #[tokio::test]
    async fn test_transparent_pixels_survive() {
        // Colour under zero alpha must not be rewritten.
        let image = RgbaImage::from_fn(3, 3, |x, y| Rgba([x as u8 * 40, y as u8 * 60, 200, (x * y) as u8]));
        let source = png_source(&image, "alpha.png");

        for level in 0..=6 {
            let output = strategy().compress(&source, level).await.unwrap();
            let decoded = image::load_from_memory(&output.bytes).unwrap();
            assert_eq!(decoded.to_rgba8().as_raw(), image.as_raw(), "level {}", level);
        }
    }

    #[tokio::test]
    async fn test_rgb_source_is_widened_to_rgba() {
        let rgb = DynamicImage::new_rgb8(5, 4);
        let mut buffer = Cursor::new(Vec::new());
        rgb.write_to(&mut buffer, ImageFormat::Png).unwrap();
        let source = SourceImage::new("rgb.png", "image/png", buffer.into_inner());

        let output = strategy().compress(&source, 6).await.unwrap();
        let decoded = image::load_from_memory(&output.bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
        assert_eq!(decoded.to_rgba8().as_raw(), rgb.to_rgba8().as_raw());
    }

    #[tokio::test]
    async fn test_corrupt_input_is_decode_error() {
        let source = SourceImage::new("broken.png", "image/png", b"\x89PNG\r\n\x1a\nbroken".to_vec());
        let result = strategy().compress(&source, 3).await;
        assert!(matches!(result, Err(CompressionError::Decode(_))));
    }
}
