pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const MIN_LOSSLESS_LEVEL: u8 = 0;
pub const MAX_LOSSLESS_LEVEL: u8 = 6;

/// Lossless re-encodes are always emitted as 8-bit RGBA.
pub const LOSSLESS_BIT_DEPTH: u8 = 32;

pub const OPTIMIZED_FILE_PREFIX: &str = "optimized-";

// Size-targeted lossy search
pub const MAX_SIZE_SEARCH_PASSES: u32 = 10;
pub const SIZE_SEARCH_SCALE: f32 = 0.95;
pub const MIN_SEARCH_QUALITY: f32 = 0.01;

pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Optimized size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif", "gif"];

/// MIME type for an input file, looked up by extension.
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tiff" | "tif" => Some("image/tiff"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
