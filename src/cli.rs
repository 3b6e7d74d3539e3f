use crate::constants::DEFAULT_QUALITY;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-slim",
    about = "Optimize images locally: lossless PNG, lossy JPEG and WebP",
    long_about = "img-slim re-encodes images entirely on this machine. PNG output is re-encoded \
                  losslessly with oxipng (pixels are never altered); JPEG and WebP output is \
                  re-encoded lossily. A single 1-100 quality setting drives both.",
    version,
    after_help = "EXAMPLES:\n  \
    img-slim compress photo.jpg -f webp -q 75\n  \
    img-slim compress scan.png -f png -q 100 -o ./out\n  \
    img-slim batch \"./images/*.png\" ./optimized -r -f png -q 60"
)]
pub struct Args {
    #[arg(short = 'v', long, global = true, help = "Show debug logging")]
    pub verbose: bool,

    #[arg(long, global = true, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Optimize a single image file",
        long_about = "Optimize one image and write it next to the output directory as \
                      optimized-<name>.<ext>."
    )]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(short = 'o', long, default_value = ".", help = "Output directory")]
        output: PathBuf,

        #[command(flatten)]
        encode: EncodeArgs,
    },

    #[command(
        about = "Optimize many images",
        long_about = "Optimize every image in a directory or matching a glob pattern. \
                      A failure on one image does not stop the others."
    )]
    Batch {
        #[arg(
            help = "Input directory, file pattern, or glob",
            long_help = "Input can be a directory path, file pattern, or glob expression. \
                         Examples: './images', '*.jpg', '/path/to/images/*.png'"
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,

        #[arg(
            short = 'c',
            long,
            help = "Images processed at once (default: number of CPUs)"
        )]
        concurrency: Option<usize>,

        #[command(flatten)]
        encode: EncodeArgs,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct EncodeArgs {
    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY,
        help = "Quality (1-100)",
        long_help = "Quality from 1 to 100. For PNG it selects the lossless effort level \
                     (1 = fastest, 100 = smallest); for JPEG and WebP it is the encoder quality."
    )]
    pub quality: u8,

    #[arg(short = 'f', long, default_value = "webp", help = "Output format (png, jpeg, webp)")]
    pub format: String,

    #[arg(
        long,
        help = "Upper bound on lossy output size in MB",
        long_help = "Re-encode JPEG/WebP output at decreasing quality and size until it fits. \
                     Off by default."
    )]
    pub max_size_mb: Option<f64>,

    #[arg(
        long,
        help = "Downscale lossy output so its longest side fits",
        long_help = "Maximum width or height of JPEG/WebP output in pixels. Off by default."
    )]
    pub max_dimension: Option<u32>,

    #[arg(long, help = "Run the lossy encoder on the calling task instead of a worker")]
    pub no_worker: bool,

    #[arg(
        short = 'j',
        long,
        help = "Number of threads for PNG optimization (default: auto)"
    )]
    pub threads: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_compress_defaults() {
        let args = Args::parse_from(["img-slim", "compress", "photo.jpg"]);
        match args.command {
            Commands::Compress { input, output, encode } => {
                assert_eq!(input, PathBuf::from("photo.jpg"));
                assert_eq!(output, PathBuf::from("."));
                assert_eq!(encode.quality, DEFAULT_QUALITY);
                assert_eq!(encode.format, "webp");
                assert_eq!(encode.max_size_mb, None);
                assert_eq!(encode.max_dimension, None);
                assert!(!encode.no_worker);
            }
            _ => panic!("expected compress"),
        }
    }

    #[test]
    fn test_batch_flags() {
        let args = Args::parse_from([
            "img-slim", "batch", "in", "out", "-r", "-c", "2", "-q", "30", "-f", "png",
        ]);
        match args.command {
            Commands::Batch { recursive, concurrency, encode, .. } => {
                assert!(recursive);
                assert_eq!(concurrency, Some(2));
                assert_eq!(encode.quality, 30);
                assert_eq!(encode.format, "png");
            }
            _ => panic!("expected batch"),
        }
    }
}
