//! Presentation helpers shared by the CLI commands.

use crate::artifact::{CompressionOutcome, EncodedArtifact};
use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ERROR_PREFIX, ORIGINAL_SIZE_PREFIX,
    PROGRESS_BAR_TEMPLATE, PROGRESS_SPINNER_TEMPLATE, SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::report;
use crate::source::SourceImage;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress spinner with consistent styling
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

/// Create a bar counting up to `len` items
pub fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// Format file size in human-readable format
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Size in kilobytes with two decimals, e.g. "12.34 KB".
pub fn format_kilobytes(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Calculate compression ratio as a percentage
///
/// Positive means the output is smaller, negative means it grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// Label shown next to an optimized image, e.g. "PNG, level 4" or "WEBP".
pub fn artifact_label(artifact: &EncodedArtifact) -> String {
    match artifact.level() {
        Some(level) => format!("{}, level {}", artifact.format(), level),
        None => artifact.format().to_string(),
    }
}

/// Print the original/optimized pair for one image.
///
/// `saved_as` overrides the artifact's suggested name when it was written
/// under a different one.
pub fn print_outcome(source: &SourceImage, outcome: &CompressionOutcome, saved_as: Option<&str>) {
    report!("🖼️  {}", source.name());
    report!("  {} {}", ORIGINAL_SIZE_PREFIX, format_kilobytes(source.size()));

    match outcome {
        CompressionOutcome::Success(artifact) => {
            let saved_as = saved_as.unwrap_or_else(|| artifact.file_name());
            let ratio = calculate_compression_ratio(source.size() as u64, artifact.size() as u64);
            report!(
                "  {} {} ({})",
                COMPRESSED_SIZE_PREFIX,
                format_kilobytes(artifact.size()),
                artifact_label(artifact)
            );
            report!("  {} {:.1}%", COMPRESSION_RATIO_PREFIX, ratio);
            if ratio > 0.0 {
                report!("  {} Saved as {}", SUCCESS_PREFIX, saved_as);
            } else {
                report!(
                    "  {}  File size increased by {:.1}%, saved as {}",
                    WARNING_PREFIX,
                    ratio.abs(),
                    saved_as
                );
            }
        }
        CompressionOutcome::Failure(failure) => {
            eprintln!(
                "  {} Failed to optimize {} locally ({})",
                ERROR_PREFIX, failure.image.name, failure.kind
            );
        }
    }
}
