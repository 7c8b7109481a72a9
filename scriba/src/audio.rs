use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Target sample rate for whisper.cpp.
pub const SAMPLE_RATE: u32 = 16_000;

/// Load an audio file and return 16kHz mono f32 samples ready for whisper.
///
/// Decoding goes through an ffmpeg subprocess, so every format ffmpeg knows
/// is accepted (mp3, wav, ogg, opus, aac, flac, m4a, ...). ffmpeg handles
/// decode, channel downmix, and resampling in one shot.
pub fn load_audio(path: &Path) -> Result<Vec<f32>> {
    if !path.exists() {
        return Err(Error::AudioNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "decoding audio");

    let output = Command::new("ffmpeg")
        .args(["-nostdin", "-threads", "0", "-i"])
        .arg(path)
        .args([
            "-f",
            "s16le",
            "-ac",
            "1",
            "-acodec",
            "pcm_s16le",
            "-ar",
            &SAMPLE_RATE.to_string(),
            "-",
        ])
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AudioDecode("ffmpeg not found — install with: apt install ffmpeg".into())
            } else {
                Error::AudioDecode(format!("failed to run ffmpeg: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::AudioDecode(format!("ffmpeg failed: {stderr}")));
    }

    if output.stdout.is_empty() {
        return Err(Error::AudioDecode("ffmpeg produced no output".into()));
    }

    // s16le bytes to f32 samples in [-1.0, 1.0]
    let samples: Vec<f32> = output
        .stdout
        .chunks_exact(2)
        .map(|chunk| {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            sample as f32 / 32768.0
        })
        .collect();

    let duration = samples.len() as f64 / SAMPLE_RATE as f64;
    info!(
        path = %path.display(),
        duration_secs = format!("{duration:.1}"),
        "audio ready"
    );

    Ok(samples)
}
