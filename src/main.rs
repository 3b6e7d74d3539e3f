use anyhow::{Context, Result};
use clap::Parser;
use img_slim::cli::{Args, Commands, EncodeArgs};
use img_slim::constants::{ERROR_PREFIX, SUCCESS_PREFIX, WARNING_PREFIX};
use img_slim::logger::{self, is_quiet};
use img_slim::report;
use img_slim::utils::{
    calculate_compression_ratio, create_progress_bar, create_progress_spinner, format_file_size,
    print_outcome,
};
use img_slim::{
    collect_image_files, unique_file_name, BatchRunner, BatchSettings, BatchSummary, CompletionFn,
    CompressionOrchestrator, CompressionOutcome, EncodedArtifact, ProgressFn, SourceImage,
};
use indicatif::ProgressBar;
use rayon::ThreadPoolBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose, args.quiet);

    match args.command {
        Commands::Compress { input, output, encode } => {
            setup_thread_pool(encode.threads);
            compress_file(&input, &output, &encode).await?;
        }
        Commands::Batch { input, output, recursive, concurrency, encode } => {
            setup_thread_pool(encode.threads);
            compress_batch(&input, &output, recursive, concurrency, &encode).await?;
        }
    }

    Ok(())
}

fn setup_thread_pool(threads: Option<usize>) {
    if let Some(num_threads) = threads {
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .unwrap_or_else(|e| {
                warn!("failed to set thread pool size: {}", e);
            });
    }
}

/// Reads the encode flags once; the result is what every image sees.
fn settings_from_args(encode: &EncodeArgs) -> img_slim::Result<BatchSettings> {
    let mut settings =
        BatchSettings::parse(encode.quality, &encode.format)?.with_web_worker(!encode.no_worker);
    if let Some(max_size_mb) = encode.max_size_mb {
        settings = settings.with_max_size_mb(max_size_mb)?;
    }
    if let Some(max_dimension) = encode.max_dimension {
        settings = settings.with_max_width_or_height(max_dimension)?;
    }
    Ok(settings)
}

fn progress_bar(build: impl FnOnce() -> ProgressBar) -> ProgressBar {
    if is_quiet() {
        ProgressBar::hidden()
    } else {
        build()
    }
}

fn write_artifact(output_dir: &Path, file_name: &str, artifact: &EncodedArtifact) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    let path = output_dir.join(file_name);
    fs::write(&path, artifact.bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

async fn compress_file(input: &Path, output_dir: &Path, encode: &EncodeArgs) -> Result<()> {
    let settings = settings_from_args(encode)?;
    let source = SourceImage::from_path(input)
        .with_context(|| format!("failed to load {}", input.display()))?;

    report!("🗜️  Optimizing image: {:?}", input);

    let pb = progress_bar(|| create_progress_spinner("Optimizing..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    let spinner = pb.clone();
    let progress: ProgressFn =
        Arc::new(move |percent| spinner.set_message(format!("Optimizing... {}%", percent)));

    let result = CompressionOrchestrator::default()
        .try_compress(&source, settings, Some(progress))
        .await;
    pb.finish_and_clear();

    let artifact = result.with_context(|| format!("failed to optimize {}", source.name()))?;
    let path = write_artifact(output_dir, artifact.file_name(), &artifact)?;
    print_outcome(&source, &CompressionOutcome::Success(artifact), None);
    report!("📁 Output: {:?}", path);

    Ok(())
}

async fn compress_batch(
    input: &str,
    output_dir: &Path,
    recursive: bool,
    concurrency: Option<usize>,
    encode: &EncodeArgs,
) -> Result<()> {
    let settings = settings_from_args(encode)?;

    report!("🚀 Starting batch optimization...");
    report!("📁 Input: {}", input);
    report!("📁 Output: {:?}", output_dir);

    let image_files = collect_image_files(input, recursive)?;
    if image_files.is_empty() {
        report!("{}  No image files found in: {}", WARNING_PREFIX, input);
        return Ok(());
    }

    let mut sources = Vec::with_capacity(image_files.len());
    let mut unreadable = 0usize;
    for path in &image_files {
        match SourceImage::from_path(path) {
            Ok(source) => sources.push(source),
            Err(e) => {
                unreadable += 1;
                eprintln!("{} Skipping {:?}: {}", ERROR_PREFIX, path, e);
            }
        }
    }

    report!("📊 Found {} image files", sources.len());

    let pb = progress_bar(|| create_progress_bar(sources.len() as u64));
    let bar = pb.clone();
    let on_complete: CompletionFn = Arc::new(move |_, _| bar.inc(1));

    let mut runner = BatchRunner::default().with_completion(on_complete);
    if let Some(concurrency) = concurrency {
        runner = runner.with_concurrency(concurrency);
    }
    let outcomes = runner.run(&sources, settings).await;
    pb.finish_and_clear();

    // Inputs sharing a stem (a.jpg, a.png, sub/a.png) get numbered names.
    let mut taken = HashSet::new();
    let mut written = 0usize;
    let mut write_failures = 0usize;
    for (source, outcome) in sources.iter().zip(&outcomes) {
        match outcome {
            CompressionOutcome::Success(artifact) => {
                let file_name = unique_file_name(artifact.file_name(), &mut taken);
                match write_artifact(output_dir, &file_name, artifact) {
                    Ok(_) => {
                        written += 1;
                        print_outcome(source, outcome, Some(&file_name));
                    }
                    Err(e) => {
                        write_failures += 1;
                        eprintln!("{} {:#}", ERROR_PREFIX, e);
                    }
                }
            }
            CompressionOutcome::Failure(_) => print_outcome(source, outcome, None),
        }
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    let failed = summary.failed + unreadable + write_failures;
    let ratio = calculate_compression_ratio(summary.total_before as u64, summary.total_after as u64);

    report!("\n📊 Batch optimization summary:");
    report!("  {} Optimized: {}", SUCCESS_PREFIX, written);
    report!("  {} Failed: {}", ERROR_PREFIX, failed);
    report!(
        "  📦 {} → {} ({:.1}% saved)",
        format_file_size(summary.total_before as u64),
        format_file_size(summary.total_after as u64),
        ratio
    );

    Ok(())
}
