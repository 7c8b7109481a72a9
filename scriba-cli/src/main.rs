use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scriba::{BatchOptions, Device, Engine, Language, Model, Transcript, TranscribeOptions};

#[derive(Parser)]
#[command(
    name = "scriba",
    about = "Batch-transcribe a directory of audio files into a directory of transcripts"
)]
struct Cli {
    /// Directory containing input audio files.
    #[arg(default_value = "audio")]
    input_dir: PathBuf,

    /// Directory transcripts are written to (created if absent).
    #[arg(default_value = "transcripts")]
    output_dir: PathBuf,

    /// Input file extension to match.
    #[arg(short, long, default_value = "mp3")]
    extension: String,

    /// Transcript output format.
    #[arg(short, long, default_value = "timestamped")]
    format: OutputFormat,

    /// Whisper model to use (name or path to a .ggml file).
    #[arg(short, long, default_value = "medium")]
    model: String,

    /// Language code (e.g. "en", "zh") or "auto" for detection.
    #[arg(short, long, default_value = "auto")]
    language: String,

    /// Inference device (cpu or gpu).
    #[arg(short, long, default_value = "cpu")]
    device: String,

    /// GPU device ID.
    #[arg(long, default_value = "0")]
    gpu_device: u32,

    /// Number of threads (default: auto).
    #[arg(long)]
    threads: Option<u32>,

    /// Beam search size; 0 for greedy sampling.
    #[arg(long, default_value = "5")]
    beam_size: u32,

    /// Sampling temperature.
    #[arg(long, default_value = "0.0")]
    temperature: f32,

    /// Disable voice activity detection.
    #[arg(long)]
    no_vad: bool,

    /// Translate to English.
    #[arg(long)]
    translate: bool,

    /// Model cache directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Exit non-zero if any file failed to transcribe.
    #[arg(long)]
    strict: bool,

    /// List available models.
    #[arg(long)]
    list_models: bool,

    /// Download a model without transcribing.
    #[arg(long)]
    download_model: Option<String>,

    /// List supported languages.
    #[arg(long)]
    list_languages: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One `[start-end] text` line per segment.
    Timestamped,
    /// Plain concatenated text.
    Text,
    /// Full transcript as JSON.
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Timestamped | OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }

    fn render(self, transcript: &Transcript) -> scriba::Result<String> {
        match self {
            OutputFormat::Timestamped => Ok(transcript.timestamped()),
            OutputFormat::Text => Ok(transcript.text()),
            OutputFormat::Json => transcript.to_json_pretty(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scriba=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.list_languages {
        println!("{:<6} {}", "CODE", "LANGUAGE");
        println!("{:<6} {}", "----", "--------");
        for (code, name) in Language::supported() {
            println!("{code:<6} {name}");
        }
        return;
    }

    if cli.list_models {
        let models = [
            ("tiny", "75 MB"),
            ("tiny.en", "75 MB"),
            ("base", "142 MB"),
            ("base.en", "142 MB"),
            ("small", "466 MB"),
            ("small.en", "466 MB"),
            ("medium", "1.5 GB"),
            ("medium.en", "1.5 GB"),
            ("large-v2", "2.9 GB"),
            ("large-v3", "2.9 GB"),
            ("large-v3-turbo", "~1.6 GB"),
        ];
        println!("{:<16} {}", "MODEL", "SIZE");
        println!("{:<16} {}", "-----", "----");
        for (name, size) in models {
            println!("{name:<16} {size}");
        }

        let cache_dir = cli
            .cache_dir
            .unwrap_or_else(|| TranscribeOptions::default().resolve_cache_dir());
        let cached = scriba::model::list_cached_models(&cache_dir);
        if !cached.is_empty() {
            println!("\nCached models in {}:", cache_dir.display());
            for path in cached {
                println!(
                    "  {}",
                    path.file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or_default()
                );
            }
        }
        return;
    }

    if let Some(model_name) = &cli.download_model {
        let model = match Model::parse_name(model_name) {
            Some(m) => m,
            None => {
                eprintln!("Unknown model: {model_name}");
                eprintln!("Use --list-models to see available models");
                std::process::exit(1);
            }
        };
        let cache_dir = cli
            .cache_dir
            .unwrap_or_else(|| TranscribeOptions::default().resolve_cache_dir());
        match scriba::model::ensure_model(&model, &cache_dir).await {
            Ok(path) => println!("Model ready: {}", path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let model = match Model::parse_name(&cli.model) {
        Some(m) => m,
        None => {
            // Try as custom model path
            let path = PathBuf::from(&cli.model);
            if path.exists() {
                Model::Custom(path)
            } else {
                eprintln!("Unknown model: {}", cli.model);
                eprintln!("Use --list-models to see available models, or provide a path to a .ggml file");
                std::process::exit(1);
            }
        }
    };

    let language = match Language::new(&cli.language) {
        Ok(lang) => lang,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --list-languages to see supported languages");
            std::process::exit(1);
        }
    };

    let device = match Device::parse_name(&cli.device) {
        Some(d) => d,
        None => {
            eprintln!("Unknown device: {} (expected cpu or gpu)", cli.device);
            std::process::exit(1);
        }
    };

    let mut opts = TranscribeOptions::new()
        .model(model)
        .device(device)
        .gpu_device(cli.gpu_device)
        .temperature(cli.temperature)
        .vad(!cli.no_vad)
        .translate(cli.translate);
    opts.language = language;

    opts = match cli.beam_size {
        0 => opts.greedy(),
        n => opts.beam_size(n),
    };
    if let Some(n) = cli.threads {
        opts = opts.n_threads(n);
    }
    if let Some(dir) = cli.cache_dir {
        opts = opts.cache_dir(dir);
    }

    // Setup phase: a failure here aborts the run before any file is touched.
    let cache_dir = opts.resolve_cache_dir();
    let model_path = match scriba::model::ensure_model(&opts.model, &cache_dir).await {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let engine = match Engine::new(&model_path, opts) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let batch_opts = BatchOptions::new()
        .input_ext(&cli.extension)
        .output_ext(cli.format.extension());

    let result = scriba::batch::run(&cli.input_dir, &cli.output_dir, &batch_opts, |path| {
        let transcript = engine.transcribe_path(path)?;
        cli.format.render(&transcript)
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    eprintln!(
        "Batch complete: {} found, {} skipped, {} succeeded, {} failed",
        summary.found, summary.skipped, summary.succeeded, summary.failed
    );

    if cli.strict && summary.failed > 0 {
        std::process::exit(1);
    }
}
