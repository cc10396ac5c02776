//! End-to-end runs of the binary against replayed service answers.
//!
//! 1. Write a cassette with one answer per expected service call.
//! 2. Run `codebrief` with `CODEBRIEF_REPLAY` over a temp project.
//! 3. Assert the document layout and ordering.
//! 4. Run again with an empty cassette: every summary must come from the cache.

use std::path::Path;
use std::process::Command;

use serde_json::json;

use codebrief::cassette::recorder::CassetteRecorder;

fn write_project(root: &Path) {
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("CMakeLists.txt"), "project(demo)\nadd_executable(demo src/foo.cpp)\n")
        .unwrap();
    std::fs::write(root.join("src/foo.h"), "struct Foo { int run(); };\n").unwrap();
    std::fs::write(root.join("src/foo.cpp"), "#include \"foo.h\"\nint Foo::run() { return 1; }\n")
        .unwrap();
}

fn answer(text: &str) -> serde_json::Value {
    json!({"ok": {"text": text, "prompt_tokens": 10, "completion_tokens": 5}})
}

fn run_with_cassette(root: &Path, cassette: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_codebrief"))
        .arg(root)
        .arg("src")
        .args(extra)
        .env("CODEBRIEF_REPLAY", cassette)
        .env_remove("CODEBRIEF_RECORD")
        .output()
        .expect("failed to run codebrief binary")
}

#[test]
fn replayed_run_writes_ranked_document_and_fills_cache() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("demo");
    write_project(&root);

    // Call order: root directory first, then src, then the overview.
    let first = dir.path().join("first.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&first, "first-run");
    recorder.record(
        "llm",
        "complete",
        json!({}),
        answer("## Summary\nBuild script.\n[Relevance score: 2]"),
    );
    recorder.record(
        "llm",
        "complete",
        json!({}),
        answer("## Summary\nThe Foo runner.\n[Relevance score: 9]"),
    );
    recorder.record("llm", "complete", json!({}), answer("Demo runs a Foo."));
    recorder.finish().unwrap();

    let output = run_with_cassette(&root, &first, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 cached, 2 generated, 0 skipped"));

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.starts_with("# demo\n\n## Overview\n\nDemo runs a Foo."));
    let tree = readme.find("## Project Structure").unwrap();
    let foo = readme.find("## foo.h / foo.cpp").unwrap();
    let build = readme.find("## CMakeLists.txt").unwrap();
    assert!(tree < foo && foo < build);
    assert!(readme.trim_end().ends_with("Build script."));
    assert!(!readme.contains("Relevance score:"));
    assert!(root.join(".codebrief/summaries.json").exists());

    // No recorded answers left: any service call would abort the run.
    let second = dir.path().join("second.cassette.yaml");
    CassetteRecorder::new(&second, "second-run").finish().unwrap();

    let output = run_with_cassette(&root, &second, &["--no-overview"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 cached, 0 generated, 0 skipped"));

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.contains("demo consists of 3 source files in 2 directories."));
    assert!(readme.find("## foo.h / foo.cpp").unwrap() < readme.find("## CMakeLists.txt").unwrap());
}

#[test]
fn failed_service_call_skips_component_but_run_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("demo");
    write_project(&root);

    let cassette = dir.path().join("flaky.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&cassette, "flaky");
    recorder.record("llm", "complete", json!({}), json!({"err": "503 overloaded"}));
    recorder.record("llm", "complete", json!({}), answer("Foo.\n[Relevance score: 7]"));
    recorder.finish().unwrap();

    let output = run_with_cassette(&root, &cassette, &["--attempts", "1", "--no-overview"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 skipped"));
    assert!(stdout.contains("skipped CMakeLists.txt"));

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.contains("## foo.h / foo.cpp"));
    assert!(!readme.contains("## CMakeLists.txt"));
}
