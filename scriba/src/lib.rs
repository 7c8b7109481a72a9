pub mod audio;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod types;

pub use batch::{BatchOptions, RunSummary};
pub use config::{Device, Language, Model, TranscribeOptions};
pub use engine::Engine;
pub use error::{Error, Result};
pub use types::{Segment, Transcript};

use std::path::Path;

/// Transcribe a single local audio file with default options.
pub async fn transcribe_file(path: impl AsRef<Path>) -> Result<Transcript> {
    transcribe_file_with_options(path, TranscribeOptions::default()).await
}

/// Transcribe a single local audio file with custom options.
pub async fn transcribe_file_with_options(
    path: impl AsRef<Path>,
    options: TranscribeOptions,
) -> Result<Transcript> {
    let cache_dir = options.resolve_cache_dir();
    let model_path = model::ensure_model(&options.model, &cache_dir).await?;

    let engine = Engine::new(&model_path, options)?;
    engine.transcribe_path(path.as_ref())
}
