//! Per-image results handed back to the caller.

use crate::constants::OPTIMIZED_FILE_PREFIX;
use crate::error::ErrorKind;
use crate::formats::OutputFormat;
use std::collections::HashSet;

/// Which input an outcome belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageIdentity {
    pub index: usize,
    pub name: String,
}

/// An optimized image and its metadata.
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    bytes: Vec<u8>,
    format: OutputFormat,
    file_name: String,
    original_size: usize,
    level: Option<u8>,
}

impl EncodedArtifact {
    pub(crate) fn new(
        bytes: Vec<u8>,
        format: OutputFormat,
        file_name: String,
        original_size: usize,
        level: Option<u8>,
    ) -> Self {
        Self {
            bytes,
            format,
            file_name,
            original_size,
            level,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Suggested download name, e.g. `optimized-photo.webp`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn original_size(&self) -> usize {
        self.original_size
    }

    /// Effort level of a lossless encode; `None` for lossy output.
    pub fn level(&self) -> Option<u8> {
        self.level
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionFailure {
    pub image: ImageIdentity,
    pub kind: ErrorKind,
}

/// Result of compressing a single image. There is no partial outcome.
#[derive(Debug, Clone)]
pub enum CompressionOutcome {
    Success(EncodedArtifact),
    Failure(CompressionFailure),
}

impl CompressionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompressionOutcome::Success(_))
    }

    pub fn artifact(&self) -> Option<&EncodedArtifact> {
        match self {
            CompressionOutcome::Success(artifact) => Some(artifact),
            CompressionOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&CompressionFailure> {
        match self {
            CompressionOutcome::Success(_) => None,
            CompressionOutcome::Failure(failure) => Some(failure),
        }
    }
}

/// Derives the download name: prefix + name without its last extension +
/// the format's extension.
///
/// Only a trailing `.<word characters>` counts as an extension, so names
/// without one, and dot-files such as `.hidden`, keep their full text.
pub fn suggested_file_name(source_name: &str, format: OutputFormat) -> String {
    let stem = match source_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            stem
        }
        _ => source_name,
    };
    format!("{}{}.{}", OPTIMIZED_FILE_PREFIX, stem, format.extension())
}

/// Returns `file_name`, or `<stem>-<n>.<ext>` with the smallest free `n` when
/// the name is already in `taken`. The chosen name is recorded in `taken`.
/// Comparison is case-insensitive.
pub fn unique_file_name(file_name: &str, taken: &mut HashSet<String>) -> String {
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    };

    let mut candidate = file_name.to_string();
    let mut n = 1;
    while !taken.insert(candidate.to_lowercase()) {
        candidate = match extension {
            Some(ext) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", stem, n),
        };
        n += 1;
    }
    candidate
}
