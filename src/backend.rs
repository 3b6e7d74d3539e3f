//! Codec capabilities consumed by the strategies.
//!
//! The pipeline never talks to a codec directly; it goes through these traits so
//! that a decoder, a lossless encoder or a lossy re-encoder can be swapped out.
//! The defaults are built on `image`, `oxipng` and `webp`.

use crate::constants::{
    LOSSLESS_BIT_DEPTH, MAX_LOSSLESS_LEVEL, MAX_SIZE_SEARCH_PASSES, MIN_SEARCH_QUALITY,
    SIZE_SEARCH_SCALE,
};
use crate::error::{CompressionError, Result};
use crate::formats::LossyFormat;
use crate::progress::ProgressRelay;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, ImageFormat, ImageReader};
use oxipng::{BitDepth, ColorType, Options, RawImage};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Turns an encoded container into a structural image.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], mime_hint: &str) -> Result<DynamicImage>;
}

/// Encodes a flat pixel buffer into a lossless container.
pub trait LosslessEncoder: Send + Sync {
    fn encode(&self, pixels: Vec<u8>, width: u32, height: u32, bit_depth: u8, level: u8) -> Result<Vec<u8>>;
}

/// Re-encodes a whole image into a lossy container under the given settings.
pub trait LossyReencoder: Send + Sync {
    fn reencode(
        &self,
        bytes: &[u8],
        mime_hint: &str,
        config: &ReencodeConfig,
        progress: &ProgressRelay,
    ) -> Result<Vec<u8>>;
}

/// Settings handed to a [`LossyReencoder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReencodeConfig {
    /// Perceptual quality as a fraction in `(0, 1]`.
    pub initial_quality: f32,
    pub file_type: LossyFormat,
    /// Upper bound on the output size, enforced by re-encoding.
    pub max_size_mb: Option<f64>,
    /// Longest side of the output; larger images are downscaled.
    pub max_width_or_height: Option<u32>,
    /// Run the backend off the calling task.
    pub use_web_worker: bool,
}

impl ReencodeConfig {
    pub fn new(initial_quality: f32, file_type: LossyFormat) -> Self {
        Self {
            initial_quality,
            file_type,
            max_size_mb: None,
            max_width_or_height: None,
            use_web_worker: true,
        }
    }
}

/// The capability set used by one pipeline.
#[derive(Clone)]
pub struct Backends {
    pub decoder: Arc<dyn ImageDecoder>,
    pub lossless: Arc<dyn LosslessEncoder>,
    pub lossy: Arc<dyn LossyReencoder>,
}

impl Default for Backends {
    fn default() -> Self {
        Self {
            decoder: Arc::new(ImageCrateDecoder),
            lossless: Arc::new(OxipngEncoder),
            lossy: Arc::new(ImageReencoder),
        }
    }
}

/// Decodes bytes with the `image` crate.
///
/// The container format is sniffed from the content first; the declared MIME
/// type is only used when sniffing fails.
pub fn decode_image(bytes: &[u8], mime_hint: &str) -> Result<DynamicImage> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CompressionError::Decode(e.to_string()))?;

    if reader.format().is_none() {
        let format = ImageFormat::from_mime_type(mime_hint).ok_or_else(|| {
            CompressionError::Decode(format!("unrecognized image data (declared {})", mime_hint))
        })?;
        reader.set_format(format);
    }

    reader
        .decode()
        .map_err(|e| CompressionError::Decode(e.to_string()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8], mime_hint: &str) -> Result<DynamicImage> {
        decode_image(bytes, mime_hint)
    }
}

/// Lossless PNG encoder backed by oxipng.
///
/// The level selects the oxipng preset (0-6). Every reduction that could change
/// the colour representation is switched off, so output stays 8-bit RGBA.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxipngEncoder;

pub fn lossless_options(level: u8) -> Options {
    let mut options = Options::from_preset(level.min(MAX_LOSSLESS_LEVEL));
    options.bit_depth_reduction = false;
    options.color_type_reduction = false;
    options.palette_reduction = false;
    options.grayscale_reduction = false;
    options.optimize_alpha = false;
    options.scale_16 = false;
    options
}

impl LosslessEncoder for OxipngEncoder {
    fn encode(&self, pixels: Vec<u8>, width: u32, height: u32, bit_depth: u8, level: u8) -> Result<Vec<u8>> {
        if bit_depth != LOSSLESS_BIT_DEPTH {
            return Err(CompressionError::Encode(format!(
                "unsupported bit depth {}, expected {}",
                bit_depth, LOSSLESS_BIT_DEPTH
            )));
        }
        if width == 0 || height == 0 {
            return Err(CompressionError::Encode(format!(
                "invalid dimensions {}x{}",
                width, height
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                CompressionError::Encode(format!("dimensions overflow: {}x{}", width, height))
            })?;
        if pixels.len() != expected {
            return Err(CompressionError::Encode(format!(
                "pixel buffer is {} bytes, expected {}",
                pixels.len(),
                expected
            )));
        }

        let raw = RawImage::new(width, height, ColorType::RGBA, BitDepth::Eight, pixels)
            .map_err(|e| CompressionError::Encode(e.to_string()))?;
        raw.create_optimized_png(&lossless_options(level))
            .map_err(|e| CompressionError::Encode(e.to_string()))
    }
}

/// Lossy re-encoder: JPEG through the `image` crate, WebP through libwebp.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageReencoder;

impl LossyReencoder for ImageReencoder {
    fn reencode(
        &self,
        bytes: &[u8],
        mime_hint: &str,
        config: &ReencodeConfig,
        progress: &ProgressRelay,
    ) -> Result<Vec<u8>> {
        progress.report(0);
        let mut image = decode_image(bytes, mime_hint)?;
        progress.report(10);

        if let Some(max) = config.max_width_or_height {
            image = fit_within(image, max);
        }

        let mut quality = config.initial_quality.clamp(MIN_SEARCH_QUALITY, 1.0);
        let mut encoded = encode_lossy(&image, config.file_type, quality)?;

        let Some(max_size_mb) = config.max_size_mb else {
            progress.report(90);
            return Ok(encoded);
        };

        let max_bytes = (max_size_mb * 1024.0 * 1024.0) as usize;
        let mut pass = 1;
        while encoded.len() > max_bytes && pass < MAX_SIZE_SEARCH_PASSES {
            quality = (quality * SIZE_SEARCH_SCALE).max(MIN_SEARCH_QUALITY);
            let (width, height) = image.dimensions();
            let width = ((width as f32 * SIZE_SEARCH_SCALE) as u32).max(1);
            let height = ((height as f32 * SIZE_SEARCH_SCALE) as u32).max(1);
            image = image.resize_exact(width, height, FilterType::Lanczos3);

            encoded = encode_lossy(&image, config.file_type, quality)?;
            debug!(pass, size = encoded.len(), max_bytes, quality, "size search pass");
            progress.report(search_progress(pass));
            pass += 1;
        }

        Ok(encoded)
    }
}

fn search_progress(pass: u32) -> u8 {
    (10 + pass * 80 / MAX_SIZE_SEARCH_PASSES).min(90) as u8
}

/// Downscales so the longest side is at most `max`, keeping the aspect ratio.
pub fn fit_within(image: DynamicImage, max: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width <= max && height <= max {
        return image;
    }
    image.resize(max, max, FilterType::Lanczos3)
}

pub fn encode_lossy(image: &DynamicImage, format: LossyFormat, quality: f32) -> Result<Vec<u8>> {
    match format {
        LossyFormat::Jpeg => encode_jpeg(image, quality),
        LossyFormat::WebP => encode_webp(image, quality),
    }
}

fn encode_jpeg(image: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| CompressionError::Encode(e.to_string()))?;

    Ok(buffer.into_inner())
}

fn encode_webp(image: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
    let rgba = image.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let memory = encoder
        .encode_simple(false, quality * 100.0)
        .map_err(|e| CompressionError::Encode(format!("WebP encoding failed: {:?}", e)))?;
    Ok(memory.to_vec())
}
