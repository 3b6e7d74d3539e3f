use crate::error::Result;
use crate::formats::{LossyFormat, OutputFormat};

/// Compression strategy for an output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Lossless,
    Lossy(LossyFormat),
}

impl Strategy {
    pub fn output_format(&self) -> OutputFormat {
        match self {
            Strategy::Lossless => OutputFormat::Png,
            Strategy::Lossy(format) => format.output_format(),
        }
    }
}

/// Bytes produced by a strategy, before they are packaged into an artifact.
#[derive(Debug, Clone)]
pub struct StrategyOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub level: Option<u8>,
}

/// Routes an output format to its strategy. New formats need both a variant
/// here and a strategy to go with it.
pub fn select(format: OutputFormat) -> Strategy {
    match format {
        OutputFormat::Png => Strategy::Lossless,
        OutputFormat::Jpeg => Strategy::Lossy(LossyFormat::Jpeg),
        OutputFormat::WebP => Strategy::Lossy(LossyFormat::WebP),
    }
}

/// Like [`select`], for a raw format name. Unknown names are an
/// `UnsupportedFormat` error.
pub fn select_by_name(name: &str) -> Result<Strategy> {
    Ok(select(name.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;

    #[test]
    fn test_select_routes_every_format() {
        assert_eq!(select(OutputFormat::Png), Strategy::Lossless);
        assert_eq!(select(OutputFormat::Jpeg), Strategy::Lossy(LossyFormat::Jpeg));
        assert_eq!(select(OutputFormat::WebP), Strategy::Lossy(LossyFormat::WebP));

        for format in OutputFormat::ALL {
            assert_eq!(select(format).output_format(), format);
        }
    }

    #[test]
    fn test_select_by_name() {
        assert_eq!(select_by_name("png").unwrap(), Strategy::Lossless);
        assert_eq!(select_by_name("JPG").unwrap(), Strategy::Lossy(LossyFormat::Jpeg));
        assert_eq!(select_by_name("webp").unwrap(), Strategy::Lossy(LossyFormat::WebP));
    }

    #[test]
    fn test_select_by_name_rejects_unknown() {
        for name in ["gif", "avif", "", "png2"] {
            assert!(matches!(
                select_by_name(name),
                Err(CompressionError::UnsupportedFormat(_))
            ));
        }
    }
}
