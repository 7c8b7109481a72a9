//! Batch-transcribe every mp3 in a directory, skipping files already done.
//!
//! Usage: cargo run --example batch -- <input-dir> [output-dir]

use std::path::Path;

use scriba::{BatchOptions, Engine, TranscribeOptions};

#[tokio::main]
async fn main() -> scriba::Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args.next().expect("usage: batch <input-dir> [output-dir]");
    let output = args.next().unwrap_or_else(|| "transcripts".into());

    let options = TranscribeOptions::default();
    let cache_dir = options.resolve_cache_dir();
    let model_path = scriba::model::ensure_model(&options.model, &cache_dir).await?;
    let engine = Engine::new(&model_path, options)?;

    let summary = scriba::batch::run(
        Path::new(&input),
        Path::new(&output),
        &BatchOptions::default(),
        |path| Ok(engine.transcribe_path(path)?.timestamped()),
    )?;

    println!(
        "{} found, {} skipped, {} succeeded, {} failed",
        summary.found, summary.skipped, summary.succeeded, summary.failed
    );

    Ok(())
}
