// Drives the compiled binary in headless --trace mode and checks the JSON
// snapshots it prints, one per narrated step.

use assert_cmd::Command;
use serde_json::Value;

fn trace(args: &[&str]) -> Vec<Value> {
    let output = Command::cargo_bin("sortscope")
        .unwrap()
        .arg("--trace")
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn bubble_trace_ends_sorted_and_complete() {
    let snapshots = trace(&["--values", "5,3,8,1"]);
    let last = snapshots.last().unwrap();

    assert_eq!(last["array"], serde_json::json!([1, 3, 5, 8]));
    assert_eq!(last["run_state"], "completed");
    assert_eq!(last["comparisons"], 6);
    assert_eq!(last["swaps"], 4);
    assert_eq!(last["sorted"], serde_json::json!([0, 1, 2, 3]));

    let first = &snapshots[0];
    assert_eq!(first["current_tag"], "begin");
    assert_eq!(first["run_state"], "running");
}

#[test]
fn step_counter_increases_by_one_per_line() {
    let snapshots = trace(&["--values", "4,1,3,2", "--algorithm", "quick"]);
    let steps: Vec<u64> = snapshots[..snapshots.len() - 1]
        .iter()
        .map(|s| s["step_count"].as_u64().unwrap())
        .collect();
    let expected: Vec<u64> = (1..=steps.len() as u64).collect();
    assert_eq!(steps, expected);
}

#[test]
fn merge_trace_uses_merge_tags() {
    let snapshots = trace(&["--values", "3,1,2", "-a", "merge"]);
    let tags: Vec<&str> = snapshots
        .iter()
        .filter_map(|s| s["current_tag"].as_str())
        .collect();
    assert!(tags.contains(&"split"));
    assert!(tags.contains(&"merge-start"));
    assert!(!tags.contains(&"pivot-chosen"));
}

#[test]
fn seeded_traces_are_reproducible() {
    let a = trace(&["--seed", "5", "-n", "8"]);
    let b = trace(&["--seed", "5", "-n", "8"]);
    assert_eq!(a, b);
}

#[test]
fn invalid_arguments_fail() {
    Command::cargo_bin("sortscope")
        .unwrap()
        .args(["--trace", "--algorithm", "heap"])
        .assert()
        .failure();

    Command::cargo_bin("sortscope")
        .unwrap()
        .args(["--trace", "--min", "9", "--max", "1"])
        .assert()
        .failure();
}
