use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{Error, Result};

/// Aggregate counts for one batch run.
///
/// `found == skipped + succeeded + failed` once `run` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// File selection for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Extension (no dot) an input file must carry. Matched ASCII
    /// case-insensitively, so `A.MP3` counts as an mp3.
    pub input_ext: String,
    /// Extension (no dot) given to output artifacts. Also the extension the
    /// skip check looks for.
    pub output_ext: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input_ext: "mp3".into(),
            output_ext: "txt".into(),
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_ext(mut self, ext: &str) -> Self {
        self.input_ext = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn output_ext(mut self, ext: &str) -> Self {
        self.output_ext = ext.trim_start_matches('.').to_string();
        self
    }
}

/// Convert every matching file in `input_dir` that has no artifact in
/// `output_dir` yet, writing each result to `<output_dir>/<stem>.<ext>`.
///
/// The artifact's existence is the only completion marker: files whose
/// artifact is already present are skipped without invoking `convert`, so an
/// interrupted run resumes at the first unfinished item on the next call.
/// A missing or empty input directory is not an error — the run returns an
/// all-zero summary. Per-item failures are logged and counted, never
/// propagated; the only fatal error is being unable to create `output_dir`.
pub fn run<F>(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    mut convert: F,
) -> Result<RunSummary>
where
    F: FnMut(&Path) -> Result<String>,
{
    let mut summary = RunSummary::default();

    if !input_dir.is_dir() {
        warn!(
            path = %input_dir.display(),
            "input directory does not exist, nothing to do"
        );
        return Ok(summary);
    }

    let items = discover(input_dir, &options.input_ext)?;
    if items.is_empty() {
        warn!(
            path = %input_dir.display(),
            extension = %options.input_ext,
            "no matching input files, nothing to do"
        );
        return Ok(summary);
    }

    summary.found = items.len();
    info!(
        count = items.len(),
        path = %input_dir.display(),
        "found input files"
    );

    fs::create_dir_all(output_dir).map_err(|e| Error::OutputDir {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    for input in &items {
        // A file that matched the extension filter always has a stem.
        let stem = match input.file_stem() {
            Some(s) => s,
            None => continue,
        };
        let id = stem.to_string_lossy();

        let artifact = output_dir.join(artifact_name(stem, &options.output_ext));
        if artifact.exists() {
            info!(identifier = %id, "transcript already exists, skipping");
            summary.skipped += 1;
            continue;
        }

        info!(identifier = %id, "starting");
        match convert(input).and_then(|text| write_artifact(&artifact, &text)) {
            Ok(()) => {
                info!(identifier = %id, "completed");
                summary.succeeded += 1;
            }
            Err(e) => {
                error!(identifier = %id, error = %e, "conversion failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        found = summary.found,
        skipped = summary.skipped,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch run complete"
    );

    Ok(summary)
}

/// Regular files in `dir` carrying `ext`, in filename order.
fn discover(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn artifact_name(stem: &OsStr, ext: &str) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    name
}

/// Write `text` through a temp file in the same directory, then rename it
/// into place. A crash mid-write leaves at most a `.part` file behind, never
/// a truncated artifact at the final path.
fn write_artifact(path: &Path, text: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, text)?;
    if let Err(e) = fs::rename(&tmp, path) {
        fs::remove_file(&tmp).ok();
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
