//! Integration tests for the `md2toon` binary.
//!
//! Exercise the caller boundary through the real binary: stdin/stdout piping,
//! file I/O, the empty-input failure, JSON and stats output, enrichment, and
//! batch conversion of a pattern directory.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture must exist")
}

fn md2toon() -> Command {
    let mut cmd = Command::cargo_bin("md2toon").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Single document
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stdin_to_stdout() {
    md2toon()
        .write_stdin(fixture("summarize.md"))
        .assert()
        .success()
        .stdout(fixture("summarize.toon"))
        .stderr("");
}

#[test]
fn file_to_stdout() {
    md2toon()
        .arg(fixture_path("summarize.md"))
        .assert()
        .success()
        .stdout(fixture("summarize.toon"));
}

#[test]
fn file_to_file_has_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("summarize.toon");

    md2toon()
        .arg(fixture_path("summarize.md"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, fixture("summarize.toon"));
    assert!(written.ends_with("sections.\"\n"));
}

#[test]
fn example_sections_are_dropped() {
    md2toon()
        .write_stdin("# STEPS\n- Do the work\n\n# EXAMPLE OUTPUT\n- ignored\n\n# OUTPUT INSTRUCTIONS\n- Use markdown\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("steps[1]{action}:\n  Do the work\n"))
        .stdout(predicate::str::contains("ignored").not());
}

#[test]
fn whitespace_only_input_converts() {
    md2toon()
        .write_stdin("\n\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("role: \"\"\nexpertise[0]:\n"));
}

#[test]
fn thinking_instruction_is_last_line() {
    md2toon()
        .write_stdin("# STEPS\n- Think step by step about the input\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with(
            "restrictions[0]:\nthinking_instruction: Think step by step\n",
        ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_stdin_fails() {
    md2toon()
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr("md2toon: empty input\n");
}

#[test]
fn empty_file_fails() {
    md2toon()
        .arg(fixture_path("empty.md"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("empty input"));
}

#[test]
fn missing_file_fails() {
    md2toon()
        .arg("/nonexistent/path/system.md")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("md2toon: Failed to read file:"));
}

#[test]
fn help_exits_zero() {
    for flag in ["-h", "--help"] {
        md2toon()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"))
            .stdout(predicate::str::contains("--output"));
    }
}

#[test]
fn batch_conflicts_with_input() {
    md2toon()
        .args(["--batch", "patterns"])
        .arg(fixture_path("summarize.md"))
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Output modes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn json_output_is_the_prompt_structure() {
    let output = md2toon()
        .arg(fixture_path("summarize.md"))
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let prompt: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        prompt["role"],
        "You are an expert in summarization, note taking and editing."
    );
    assert_eq!(prompt["steps"].as_array().unwrap().len(), 3);
    assert_eq!(prompt["output_format"], "markdown");
    assert_eq!(
        prompt["restrictions"][0]["rule"],
        "Do not output warnings or notes, just the requested sections."
    );
    assert!(prompt.get("thinking_instruction").is_none());
}

#[test]
fn stats_go_to_stderr() {
    md2toon()
        .arg(fixture_path("summarize.md"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(fixture("summarize.toon"))
        .stderr(predicate::str::is_match(r"^Markdown: \d+ bytes \(~\d+ tokens\) -> TOON: \d+ bytes \(~\d+ tokens\), -?\d+\.\d% smaller\n$").unwrap());
}

#[test]
fn enrich_fills_expertise_and_section_count() {
    md2toon()
        .arg(fixture_path("summarize.md"))
        .arg("--enrich")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "expertise[3]: summarization,note taking,editing\n",
        ))
        .stdout(predicate::str::contains("output_sections[1]:\n"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    md2toon()
        .arg(fixture_path("summarize.md"))
        .arg("-vv")
        .assert()
        .success()
        .stdout(fixture("summarize.toon"))
        .stderr(predicate::str::contains("classified document"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch
// ─────────────────────────────────────────────────────────────────────────────

/// `a.md`, `b/system.md`, plus files batch mode must ignore.
fn pattern_library() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.md"), fixture("summarize.md")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    fs::write(
        dir.path().join("b/system.md"),
        "# STEPS\n- Read the whole input\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("no_prompt")).unwrap();
    fs::write(dir.path().join("notes.txt"), "not markdown").unwrap();
    dir
}

#[test]
fn batch_converts_files_and_pattern_dirs() {
    let library = pattern_library();
    let out = tempfile::tempdir().unwrap();

    md2toon()
        .arg("--batch")
        .arg(library.path())
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(out.path().join("a.toon")).unwrap(),
        fixture("summarize.toon")
    );
    let b = fs::read_to_string(out.path().join("b.toon")).unwrap();
    assert!(b.contains("steps[1]{action}:\n  Read the whole input\n"));
    assert!(!out.path().join("no_prompt.toon").exists());
    assert!(!out.path().join("notes.toon").exists());
}

#[test]
fn batch_defaults_to_source_dir() {
    let library = pattern_library();

    md2toon().arg("--batch").arg(library.path()).assert().success();

    assert!(library.path().join("a.toon").is_file());
    assert!(library.path().join("b.toon").is_file());
}

#[test]
fn batch_json_writes_json_files() {
    let library = pattern_library();
    let out = tempfile::tempdir().unwrap();

    md2toon()
        .arg("--batch")
        .arg(library.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--json")
        .assert()
        .success();

    let b: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("b.json")).unwrap()).unwrap();
    assert_eq!(b["steps"][0]["action"], "Read the whole input");
}

#[test]
fn batch_reports_failures_after_converting_the_rest() {
    let library = pattern_library();
    fs::write(library.path().join("0_empty.md"), "").unwrap();

    md2toon()
        .arg("--batch")
        .arg(library.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("0_empty.md: empty input"))
        .stderr(predicate::str::contains("1 of 3 prompts failed"));

    assert!(library.path().join("a.toon").is_file());
    assert!(library.path().join("b.toon").is_file());
}

#[test]
fn batch_on_missing_dir_fails() {
    md2toon()
        .args(["--batch", "/nonexistent/patterns"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read directory"));
}

#[test]
fn output_dir_requires_batch() {
    md2toon()
        .args(["--output-dir", "somewhere"])
        .write_stdin("# STEPS\n- Read the whole input\n")
        .assert()
        .failure();
}
