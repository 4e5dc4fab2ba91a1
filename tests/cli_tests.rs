//! CLI integration tests for stkit
//!
//! Tests the command-line interface by running the stkit binary and
//! verifying its output and the files it writes.

use std::path::Path;
use std::process::Command;

mod common;

use common::*;

// ============================================================================
// Helper Functions
// ============================================================================

/// Run stkit in `dir` and return output
fn run_stkit(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_stkit"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Get stdout as string
fn stdout_string(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr_string(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn sample_folder(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    write_file(dir, "b_snare.wav", &sine_wav(8000, 1, 8, 400));
    write_file(dir, "a_kick.wav", &sine_wav(8000, 1, 8, 800));
    write_file(dir, "c_hat.WAV", &sine_wav(8000, 1, 8, 200));
    write_file(dir, "readme.txt", b"not audio");
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_stkit(dir.path(), &["--help"]);
    assert!(output.status.success());

    let stdout = stdout_string(&output);
    for command in ["pack", "extract", "chunks", "compare"] {
        assert!(stdout.contains(command), "help lists {}", command);
    }
}

#[test]
fn test_pack_folder_then_extract() {
    let dir = tempfile::tempdir().unwrap();
    sample_folder(&dir.path().join("samples"));

    let output = run_stkit(
        dir.path(),
        &["pack", "--title", "Kit", "--folder", "samples", "-o", "out.bin"],
    );
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));
    assert!(stdout_string(&output).contains("out.stk (97484 bytes)"));

    let kit = std::fs::read(dir.path().join("out.stk")).unwrap();
    assert_eq!(kit.len(), 97484);
    assert!(!dir.path().join("out.bin").exists());

    let output = run_stkit(dir.path(), &["extract", "out.stk", "extracted"]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));
    assert!(stdout_string(&output).contains("Extracted 15 samples."));
    assert!(stdout_string(&output).contains("SmplTrek/Pool/Audio/Drum/Kit/a_kick.wav"));

    let first = std::fs::read(dir.path().join("extracted/sample_00.wav")).unwrap();
    let last = std::fs::read(dir.path().join("extracted/sample_14.wav")).unwrap();
    let hat = std::fs::read(dir.path().join("extracted/sample_02.wav")).unwrap();
    assert_eq!(first.len(), 19318);
    assert_eq!(last, hat);
}

#[test]
fn test_pack_default_name() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "one.wav", &sine_wav(48000, 2, 16, 100));

    let output = run_stkit(dir.path(), &["pack", "--title", "T", "--mono", "one.wav"]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));

    let kits: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with("_kit.stk"))
        .collect();
    assert_eq!(kits.len(), 1);
}

#[test]
fn test_pack_non_pcm_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "ok.wav", &sine_wav(44100, 1, 16, 100));
    write_file(dir.path(), "float.wav", &build_wav(3, 1, 44100, 32, &[0u8; 400]));

    let output = run_stkit(
        dir.path(),
        &["pack", "--title", "Kit", "ok.wav", "float.wav", "-o", "kit.stk"],
    );
    assert!(!output.status.success());
    assert!(stderr_string(&output).contains("Unsupported encoding"));
    assert!(!dir.path().join("kit.stk").exists());
}

#[test]
fn test_pack_rejects_conflicting_channel_flags() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "one.wav", &sine_wav(48000, 2, 16, 10));

    let output = run_stkit(
        dir.path(),
        &["pack", "--title", "T", "--mono", "--stereo", "one.wav"],
    );
    assert!(!output.status.success());
}

#[test]
fn test_chunks() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "s.wav", &sine_wav(44100, 2, 16, 10));

    let output = run_stkit(dir.path(), &["chunks", "s.wav"]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));

    let stdout = stdout_string(&output);
    assert!(stdout.contains("RIFF size: 76"));
    assert!(stdout.contains("Chunk: fmt  at c, size: 16"));
    assert!(stdout.contains("channels=2, sample_rate=44100, bits_per_sample=16"));
    assert!(stdout.contains("Chunk: data at 24, size: 40"));
    assert!(stdout.contains("byte_rate=176400"));
}

#[test]
fn test_extract_warns_on_non_kit_input() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "s.wav", &sine_wav(44100, 1, 16, 10));

    let output = run_stkit(dir.path(), &["extract", "s.wav", "out"]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));
    assert!(stderr_string(&output).contains("is a wav file, not a kit"));
    assert!(stdout_string(&output).contains("Extracted 0 samples."));
}

#[test]
fn test_compare() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"same");
    write_file(dir.path(), "b.bin", b"same");
    write_file(dir.path(), "c.bin", b"different");

    let output = run_stkit(dir.path(), &["compare", "a.bin", "b.bin"]);
    assert!(output.status.success());
    assert!(stdout_string(&output).contains("MATCH: Files are identical."));

    let output = run_stkit(dir.path(), &["compare", "a.bin", "c.bin"]);
    assert!(stdout_string(&output).contains("MISMATCH: Files are different."));

    let output = run_stkit(dir.path(), &["compare", "a.bin", "missing.bin"]);
    assert!(!output.status.success());
}
