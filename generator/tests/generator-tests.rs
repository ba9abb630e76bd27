// Conformance tests for corebind at the binary boundary.
//
// Scope:
// - Positive cases must generate a complete top-level and exit 0
// - Negative cases (malformed config or topology) must be rejected with a
//   diagnostic naming the offender and a non-zero exit code

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

fn corebind_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_corebind"))
}

fn default_config() -> PathBuf {
    project_root().join("configs/default.json")
}

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("{}_{}_{}.{}", prefix, std::process::id(), n, ext))
}

fn write_temp_config(json: &str) -> PathBuf {
    let path = temp_path("corebind_test_config", "json");
    std::fs::write(&path, json).expect("failed to write temp config");
    path
}

/// A valid 4-core ring config with one replacement applied to break it.
fn broken_ring4(from: &str, to: &str) -> String {
    let source = std::fs::read_to_string(default_config()).unwrap();
    let broken = source.replace(from, to);
    assert_ne!(source, broken, "replacement did not match: {}", from);
    broken
}

fn expect_rejection(config_json: &str, stderr_needle: &str) {
    let config = write_temp_config(config_json);
    let output = Command::new(corebind_binary())
        .arg(&config)
        .arg("--emit")
        .arg("summary")
        .output()
        .expect("failed to run corebind");
    let _ = std::fs::remove_file(&config);

    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit code 1, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(stderr_needle),
        "stderr should mention '{}', got: {}",
        stderr_needle,
        stderr
    );
}

// ── Positive cases ──────────────────────────────────────────────────────────

#[test]
fn generates_top_level_from_default_config() {
    let out = temp_path("corebind_test_out", "v");
    let output = Command::new(corebind_binary())
        .arg(default_config())
        .arg("-o")
        .arg(&out)
        .output()
        .expect("failed to run corebind");

    assert!(
        output.status.success(),
        "corebind failed\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let text = std::fs::read_to_string(&out).expect("output file missing");
    let _ = std::fs::remove_file(&out);

    assert!(text.contains("module nebula_top #("));
    assert_eq!(text.matches("core_wrapper #(").count(), 4);
    assert_eq!(text.matches("task_dispatcher #(").count(), 1);
    assert_eq!(text.matches("memory_arbiter #(").count(), 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("4 cores, ring topology, XLEN=32"),
        "missing summary log line: {}",
        stderr
    );
}

#[test]
fn summary_emit_prints_sidecar_json() {
    let output = Command::new(corebind_binary())
        .arg(default_config())
        .arg("--emit")
        .arg("summary")
        .output()
        .expect("failed to run corebind");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("non-UTF8 output");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("summary must be JSON");
    assert_eq!(parsed["file_name"], "top.v");
    assert_eq!(parsed["num_cores"], 4);
    assert_eq!(parsed["topology"], "ring");
    assert_eq!(parsed["word_width"], 32);
    assert_eq!(parsed["config_hash"].as_str().unwrap().len(), 64);
}

#[test]
fn creates_missing_output_directories() {
    let dir = temp_path("corebind_test_dir", "d");
    let out = dir.join("generated").join("top.v");
    let output = Command::new(corebind_binary())
        .arg(default_config())
        .arg("-o")
        .arg(&out)
        .output()
        .expect("failed to run corebind");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(out.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

// ── Negative cases: topology ────────────────────────────────────────────────

#[test]
fn missing_core_entry_rejected() {
    let json = broken_ring4("      { \"core\": 3, \"neighbors\": [2, 0] }\n", "");
    // The trailing comma after core 2's entry must go too.
    let json = json.replace("{ \"core\": 2, \"neighbors\": [1, 3] },", "{ \"core\": 2, \"neighbors\": [1, 3] }");
    expect_rejection(&json, "core 3 has no entry");
}

#[test]
fn three_neighbors_rejected() {
    let json = broken_ring4("\"neighbors\": [3, 1]", "\"neighbors\": [3, 1, 2]");
    expect_rejection(&json, "lists 3 neighbors, expected exactly 2");
}

#[test]
fn out_of_range_neighbor_rejected() {
    let json = broken_ring4("\"neighbors\": [3, 1]", "\"neighbors\": [9, 1]");
    expect_rejection(&json, "core id 9 is out of range");
}

#[test]
fn duplicate_core_entry_rejected() {
    let json = broken_ring4(
        "{ \"core\": 1, \"neighbors\": [0, 2] }",
        "{ \"core\": 0, \"neighbors\": [0, 2] }",
    );
    expect_rejection(&json, "core 0 appears more than once");
}

#[test]
fn repeated_neighbor_target_rejected() {
    let json = broken_ring4("\"neighbors\": [3, 1]", "\"neighbors\": [1, 1]");
    expect_rejection(&json, "lists neighbor 1 twice");
}

// ── Negative cases: config ──────────────────────────────────────────────────

#[test]
fn zero_cores_rejected() {
    let json = broken_ring4("\"num_cores\": 4", "\"num_cores\": 0");
    expect_rejection(&json, "cores.num_cores: must be greater than zero");
}

#[test]
fn missing_required_section_rejected() {
    let json = broken_ring4("\"scheduler\"", "\"sched\"");
    expect_rejection(&json, "config parse error");
}

#[test]
fn core_type_count_mismatch_rejected() {
    let json = broken_ring4("      { \"isa\": \"RV32IM\" },\n", "");
    expect_rejection(&json, "cores.core_types");
}

#[test]
fn nonexistent_config_exits_with_io_error() {
    let output = Command::new(corebind_binary())
        .arg("configs/does_not_exist.json")
        .output()
        .expect("failed to run corebind");
    assert_eq!(output.status.code(), Some(2));
}
