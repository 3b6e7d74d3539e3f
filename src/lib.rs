pub mod artifact;
pub mod backend;
pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod lossless;
pub mod lossy;
pub mod processing;
pub mod progress;
pub mod quality;
pub mod selector;
pub mod source;
pub mod utils;

pub use artifact::{
    suggested_file_name, unique_file_name, CompressionFailure, CompressionOutcome, EncodedArtifact,
    ImageIdentity,
};
pub use backend::{
    Backends, ImageCrateDecoder, ImageDecoder, ImageReencoder, LosslessEncoder, LossyReencoder,
    OxipngEncoder, ReencodeConfig,
};
pub use batch::{collect_image_files, is_image_file, run_batch, BatchRunner, BatchSummary};
pub use error::{CompressionError, ErrorKind, Result};
pub use formats::{LossyFormat, OutputFormat};
pub use lossless::LosslessStrategy;
pub use lossy::{LossyRequest, LossyStrategy, SizeCaps};
pub use processing::{BatchSettings, CompressionOrchestrator};
pub use progress::{BatchProgressFn, CompletionFn, ProgressFn, ProgressRelay};
pub use quality::{to_lossless_level, to_lossy_quality_fraction, QualityRequest};
pub use selector::{select, select_by_name, Strategy, StrategyOutput};
pub use source::SourceImage;
