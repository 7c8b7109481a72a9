use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::config::{Device, Language, TranscribeOptions};
use crate::error::{Error, Result};
use crate::types::{Segment, Transcript};

/// A loaded whisper model ready to transcribe.
///
/// The context (model weights) is loaded once at construction and reused for
/// every file; each `transcribe` call gets its own whisper state.
pub struct Engine {
    ctx: WhisperContext,
    options: TranscribeOptions,
}

impl Engine {
    /// Load the model at `model_path` with the given options.
    pub fn new(model_path: &Path, options: TranscribeOptions) -> Result<Self> {
        info!(
            model = %model_path.display(),
            device = %options.device,
            "loading whisper model"
        );

        let mut ctx_params = WhisperContextParameters::new();
        ctx_params.use_gpu(options.device == Device::Gpu);
        ctx_params.gpu_device(options.gpu_device as i32);

        let ctx = WhisperContext::new_with_params(
            model_path
                .to_str()
                .ok_or_else(|| Error::Model("model path contains invalid UTF-8".into()))?,
            ctx_params,
        )?;

        Ok(Self { ctx, options })
    }

    /// Decode `path` with ffmpeg and transcribe it.
    pub fn transcribe_path(&self, path: &Path) -> Result<Transcript> {
        let samples = audio::load_audio(path)?;
        self.transcribe(&samples)
    }

    /// Transcribe 16kHz mono f32 samples.
    pub fn transcribe(&self, samples: &[f32]) -> Result<Transcript> {
        let mut state = self.ctx.create_state()?;

        let mut params = match self.options.beam_size {
            Some(beam_size) => FullParams::new(SamplingStrategy::BeamSearch {
                beam_size: beam_size as i32,
                patience: -1.0,
            }),
            None => FullParams::new(SamplingStrategy::Greedy { best_of: 5 }),
        };

        match &self.options.language {
            Language::Auto => params.set_detect_language(true),
            Language::Code { code, .. } => params.set_language(Some(code)),
        }

        params.set_translate(self.options.translate);
        params.set_temperature(self.options.temperature);

        if let Some(n) = self.options.n_threads {
            params.set_n_threads(n as i32);
        }

        if self.options.vad {
            params.enable_vad(true);
        }

        // Keep whisper.cpp from printing to stderr on its own
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        debug!(samples = samples.len(), "running inference");
        state.full(params, samples)?;

        let num_segments = state.full_n_segments();
        let mut segments = Vec::with_capacity(num_segments as usize);

        for i in 0..num_segments {
            let segment = state
                .get_segment(i)
                .ok_or_else(|| Error::Transcription(format!("segment {i} not found")))?;

            let text = segment
                .to_str_lossy()
                .map_err(|e| Error::Transcription(format!("segment text error: {e}")))?
                .into_owned();

            segments.push(Segment {
                start: segment.start_timestamp() as f64 / 100.0,
                end: segment.end_timestamp() as f64 / 100.0,
                text,
                no_speech_probability: segment.no_speech_probability(),
            });
        }

        let duration = samples.len() as f64 / audio::SAMPLE_RATE as f64;

        let detected_lang_id = state.full_lang_id_from_state();
        let language = whisper_rs::get_lang_str(detected_lang_id)
            .unwrap_or("unknown")
            .to_string();

        debug!(segments = segments.len(), %language, "inference complete");

        Ok(Transcript {
            segments,
            language,
            duration,
            model: self.options.model.name().to_string(),
        })
    }
}
