use super::*;
use tempfile::TempDir;

fn put(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn stem_of(path: &Path) -> String {
    path.file_stem().unwrap().to_string_lossy().into_owned()
}

#[test]
fn converts_every_input_and_persists_verbatim() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    put(&input, "a.mp3", "x");
    put(&input, "b.mp3", "x");

    let summary = run(&input, &output, &BatchOptions::default(), |path| {
        Ok(match stem_of(path).as_str() {
            "a" => "hello".to_string(),
            _ => "world".to_string(),
        })
    })
    .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            found: 2,
            skipped: 0,
            succeeded: 2,
            failed: 0
        }
    );
    assert_eq!(read(&output, "a.txt"), "hello");
    assert_eq!(read(&output, "b.txt"), "world");
}

#[test]
fn existing_artifact_skips_without_invoking_convert() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    fs::create_dir(&output).unwrap();
    put(&input, "a.mp3", "x");
    put(&input, "b.mp3", "x");
    put(&output, "a.txt", "already done");

    let mut converted = Vec::new();
    let summary = run(&input, &output, &BatchOptions::default(), |path| {
        converted.push(stem_of(path));
        Ok("fresh".to_string())
    })
    .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            found: 2,
            skipped: 1,
            succeeded: 1,
            failed: 0
        }
    );
    assert_eq!(converted, vec!["b".to_string()]);
    assert_eq!(read(&output, "a.txt"), "already done");
    assert_eq!(read(&output, "b.txt"), "fresh");
}

#[test]
fn missing_input_dir_is_a_successful_noop() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("no-such-dir");
    let output = tmp.path().join("transcripts");

    let summary = run(&input, &output, &BatchOptions::default(), |_| {
        panic!("convert must not be called")
    })
    .unwrap();

    assert_eq!(summary, RunSummary::default());
}

#[test]
fn empty_input_dir_is_a_successful_noop() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();

    let summary = run(&input, &output, &BatchOptions::default(), |_| {
        panic!("convert must not be called")
    })
    .unwrap();

    assert_eq!(summary, RunSummary::default());
}

#[test]
fn non_matching_files_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    put(&input, "a.mp3", "x");
    put(&input, "notes.txt", "not audio");
    put(&input, "cover.jpg", "not audio");

    let summary = run(&input, &output, &BatchOptions::default(), |_| {
        Ok("text".to_string())
    })
    .unwrap();

    assert_eq!(summary.found, 1);
    assert_eq!(summary.succeeded, 1);
    assert!(!output.join("notes.txt.txt").exists());
}

#[test]
fn extension_match_is_case_insensitive() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    put(&input, "LOUD.MP3", "x");

    let summary = run(&input, &output, &BatchOptions::default(), |_| {
        Ok("text".to_string())
    })
    .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert!(output.join("LOUD.txt").exists());
}

#[test]
fn second_run_skips_everything() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    put(&input, "a.mp3", "x");
    put(&input, "b.mp3", "x");
    put(&input, "c.mp3", "x");

    let first = run(&input, &output, &BatchOptions::default(), |path| {
        Ok(stem_of(path))
    })
    .unwrap();
    assert_eq!(first.succeeded, 3);

    let second = run(&input, &output, &BatchOptions::default(), |_| {
        panic!("convert must not be called on a completed set")
    })
    .unwrap();

    assert_eq!(
        second,
        RunSummary {
            found: 3,
            skipped: 3,
            succeeded: 0,
            failed: 0
        }
    );
    assert_eq!(read(&output, "b.txt"), "b");
}

#[test]
fn one_failure_does_not_abort_the_run() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    put(&input, "a.mp3", "x");
    put(&input, "b.mp3", "x");
    put(&input, "c.mp3", "x");

    let summary = run(&input, &output, &BatchOptions::default(), |path| {
        if stem_of(path) == "b" {
            Err(Error::Transcription("simulated decode failure".into()))
        } else {
            Ok("ok".to_string())
        }
    })
    .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            found: 3,
            skipped: 0,
            succeeded: 2,
            failed: 1
        }
    );
    assert!(output.join("a.txt").exists());
    assert!(!output.join("b.txt").exists());
    assert!(!output.join("b.txt.part").exists());
    assert!(output.join("c.txt").exists());
}

#[test]
fn stale_temp_file_never_counts_as_done() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    fs::create_dir(&output).unwrap();
    put(&input, "a.mp3", "x");
    // Leftover from a run that died mid-write
    put(&output, "a.txt.part", "trunc");

    let mut calls = 0;
    let summary = run(&input, &output, &BatchOptions::default(), |_| {
        calls += 1;
        Ok("complete transcript".to_string())
    })
    .unwrap();

    assert_eq!(calls, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(read(&output, "a.txt"), "complete transcript");
}

#[test]
fn items_processed_in_filename_order() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    // Created out of order on purpose
    put(&input, "c.mp3", "x");
    put(&input, "a.mp3", "x");
    put(&input, "b.mp3", "x");

    let mut order = Vec::new();
    run(&input, &output, &BatchOptions::default(), |path| {
        order.push(stem_of(path));
        Ok("text".to_string())
    })
    .unwrap();

    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn output_extension_is_configurable() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    let output = tmp.path().join("transcripts");
    fs::create_dir(&input).unwrap();
    put(&input, "a.mp3", "x");

    let options = BatchOptions::new().output_ext("json");
    let summary = run(&input, &output, &options, |_| Ok("{}".to_string())).unwrap();

    assert_eq!(summary.succeeded, 1);
    assert!(output.join("a.json").exists());

    // The skip check keys on the same extension
    let second = run(&input, &output, &options, |_| {
        panic!("convert must not be called")
    })
    .unwrap();
    assert_eq!(second.skipped, 1);
}

#[test]
fn unwritable_output_location_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("audio");
    fs::create_dir(&input).unwrap();
    put(&input, "a.mp3", "x");
    // A plain file where the output directory should go
    let output = tmp.path().join("transcripts");
    fs::write(&output, "in the way").unwrap();

    let result = run(&input, &output, &BatchOptions::default(), |_| {
        panic!("convert must not be called")
    });

    assert!(matches!(result, Err(Error::OutputDir { .. })));
}
