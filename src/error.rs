use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

/// Coarse failure category reported per image, without the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Encode,
    UnsupportedFormat,
    Configuration,
}

impl CompressionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressionError::Encode(_) => ErrorKind::Encode,
            CompressionError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            CompressionError::InvalidQuality(_) | CompressionError::InvalidConfiguration(_) => {
                ErrorKind::Configuration
            }
            // Input that could not be read is input that could not be parsed.
            CompressionError::Io(_)
            | CompressionError::Decode(_)
            | CompressionError::FileNotFound(_)
            | CompressionError::FileTooLarge(_, _)
            | CompressionError::NoImageFilesFound(_)
            | CompressionError::WalkdirError(_) => ErrorKind::Decode,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Decode => "decode error",
            ErrorKind::Encode => "encode error",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::Configuration => "configuration error",
        };
        write!(f, "{}", name)
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CompressionError::Decode("bad".into()).kind(), ErrorKind::Decode);
        assert_eq!(CompressionError::Encode("bad".into()).kind(), ErrorKind::Encode);
        assert_eq!(
            CompressionError::UnsupportedFormat("gif".into()).kind(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(CompressionError::InvalidQuality(0).kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_quality_message() {
        let msg = CompressionError::InvalidQuality(101).to_string();
        assert!(msg.contains("101"));
        assert!(msg.contains("between 1 and 100"));
    }
}
