//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn sample_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../exam_data")
}

/// A command isolated from any config in the working directory or home.
fn passpilot(sandbox: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("passpilot").unwrap();
    cmd.current_dir(sandbox.path())
        .env("HOME", sandbox.path())
        .env_remove("PASSPILOT_DATA_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn health_reports_ready() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .arg("health")
        .arg("--data-dir")
        .arg(sample_data())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam analyzer: ready"))
        .stdout(predicate::str::contains("Questions: 12 loaded, 0 rejected, 12 indexed"));
}

#[test]
fn health_without_data_dir_is_not_ready() {
    let sandbox = TempDir::new().unwrap();
    let v = json_output(passpilot(&sandbox).args(["health", "--format", "json"]));
    assert_eq!(v["ready"], false);
    assert_eq!(v["questions"], 0);
    assert!(v["reason"].as_str().unwrap().contains("not found"));
}

#[test]
fn stats_fails_when_not_ready() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .arg("stats")
        .arg("--data-dir")
        .arg(sandbox.path().join("missing"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn stats_json() {
    let sandbox = TempDir::new().unwrap();
    let v = json_output(
        passpilot(&sandbox)
            .args(["stats", "--format", "json", "--data-dir"])
            .arg(sample_data()),
    );
    assert_eq!(v["total_questions"], 12);
    assert_eq!(v["total_topics"], 7);
    assert_eq!(v["modules"]["buckets"]["CS201"], 6);
    assert_eq!(v["modules"]["buckets"]["CS202"], 6);
    assert_eq!(v["marks"]["buckets"]["15"], 3);
}

#[test]
fn query_finds_similar_question() {
    let sandbox = TempDir::new().unwrap();
    let v = json_output(
        passpilot(&sandbox)
            .args(["query", "--query", "depth first search graph", "--threshold", "0.1"])
            .args(["--format", "json", "--data-dir"])
            .arg(sample_data()),
    );
    let results = v["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert_eq!(v["total_matches"], results.len());
    assert_eq!(results[0]["id"], "al-04");
    assert_eq!(results[0]["module"], "CS202");

    let scores: Vec<f64> = results
        .iter()
        .map(|r| r["similarity"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| (0.1..=1.0).contains(s)));
}

#[test]
fn query_with_zero_top_k_is_empty() {
    let sandbox = TempDir::new().unwrap();
    let v = json_output(
        passpilot(&sandbox)
            .args(["query", "--query", "merge sort", "--top-k", "0"])
            .args(["--format", "json", "--data-dir"])
            .arg(sample_data()),
    );
    assert_eq!(v["total_matches"], 0);
}

#[test]
fn query_rejects_nan_threshold() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .args(["query", "--query", "merge sort", "--threshold", "NaN", "--data-dir"])
        .arg(sample_data())
        .assert()
        .code(2);
}

#[test]
fn topics_respects_min_frequency() {
    let sandbox = TempDir::new().unwrap();
    let v = json_output(
        passpilot(&sandbox)
            .args(["topics", "--format", "json", "--data-dir"])
            .arg(sample_data()),
    );
    assert_eq!(v["min_frequency"], 2);
    assert_eq!(v["total_topics"], 4);
    assert_eq!(v["topics"][0]["topic"], "Graphs");
    assert_eq!(v["topics"][0]["frequency"], 3);

    let all = json_output(
        passpilot(&sandbox)
            .args(["topics", "--min-frequency", "1", "--format", "json", "--data-dir"])
            .arg(sample_data()),
    );
    assert_eq!(all["total_topics"], 7);
}

#[test]
fn strategy_plan_and_inputs() {
    let sandbox = TempDir::new().unwrap();
    let v = json_output(
        passpilot(&sandbox)
            .args(["strategy", "--studied", "Arrays", "--internal-marks", "30"])
            .args(["--format", "json", "--data-dir"])
            .arg(sample_data()),
    );
    assert_eq!(v["inputs"]["calculated_target_marks"], 45.0);
    assert_eq!(v["inputs"]["studied_topics"][0], "Arrays");
    assert_eq!(v["feasible"], true);

    let topics: Vec<&str> = v["recommended_topics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["topic"].as_str().unwrap())
        .collect();
    assert_eq!(topics, vec!["Graphs", "Trees", "Linked Lists", "Sorting"]);
}

#[test]
fn strategy_text_reports_infeasible_target() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .args(["strategy", "--overall-pass-threshold", "500", "--data-dir"])
        .arg(sample_data())
        .assert()
        .success()
        .stdout(predicate::str::contains("Feasible: NO"));
}

#[test]
fn strategy_rejects_negative_internal_marks() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .args(["strategy", "--internal-marks=-5", "--data-dir"])
        .arg(sample_data())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("internal marks"));
}

#[test]
fn simulate_with_seed_is_reproducible() {
    let sandbox = TempDir::new().unwrap();
    let run = || {
        json_output(
            passpilot(&sandbox)
                .args(["simulate", "--studied", "Graphs", "--trials", "500", "--seed", "7"])
                .args(["--format", "json", "--data-dir"])
                .arg(sample_data()),
        )
    };
    let first = run();
    assert_eq!(first, run());
    assert_eq!(first["trials"], 500);
    assert_eq!(first["seed"], 7);
    let p = first["pass_probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
    assert_eq!(first["inputs"]["calculated_target_marks"], 75.0);
}

#[test]
fn simulate_rejects_zero_trials() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .args(["simulate", "--trials", "0", "--data-dir"])
        .arg(sample_data())
        .assert()
        .code(2);
}

#[test]
fn save_writes_report() {
    let sandbox = TempDir::new().unwrap();
    let report_path = sandbox.path().join("reports/topics.json");
    passpilot(&sandbox)
        .args(["topics", "--data-dir"])
        .arg(sample_data())
        .arg("--save")
        .arg(&report_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to"));

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["command"], "topics");
    assert_eq!(report["payload"]["total_topics"], 4);
    assert!(report["id"].is_string());
}

#[test]
fn validate_reports_rejected_records() {
    let sandbox = TempDir::new().unwrap();
    let data = sandbox.path().join("data");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(
        data.join("mixed.json"),
        r#"[
            {"module": "M1", "question": "Explain recursion.", "marks": 5},
            {"module": "M1", "marks": 5}
        ]"#,
    )
    .unwrap();
    std::fs::write(data.join("broken.json"), "{ not json").unwrap();

    passpilot(&sandbox)
        .arg("validate")
        .arg("--data-dir")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 question(s) accepted"))
        .stdout(predicate::str::contains("WARNING"));
}

#[test]
fn validate_sample_data() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .arg("validate")
        .arg("--data-dir")
        .arg(sample_data())
        .assert()
        .success()
        .stdout(predicate::str::contains("12 question(s) accepted, 0 rejected"))
        .stdout(predicate::str::contains("All question files valid"));
}

#[test]
fn config_file_sets_data_dir() {
    let sandbox = TempDir::new().unwrap();
    let config = sandbox.path().join("custom.toml");
    std::fs::write(
        &config,
        format!(
            "data_dir = {:?}\n\n[topics]\nmin_frequency = 3\n",
            sample_data().display().to_string()
        ),
    )
    .unwrap();

    let v = json_output(
        passpilot(&sandbox)
            .args(["topics", "--format", "json", "--config"])
            .arg(&config),
    );
    assert_eq!(v["min_frequency"], 3);
    assert_eq!(v["total_topics"], 1);
}

#[test]
fn init_creates_starter_files() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created passpilot.toml"));

    assert!(sandbox.path().join("passpilot.toml").exists());
    assert!(sandbox.path().join("exam_data/example.json").exists());

    // The starter files are picked up from the working directory.
    passpilot(&sandbox)
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("Questions: 3 loaded"));

    passpilot(&sandbox)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn missing_config_file_fails() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .args(["stats", "--config", "nope.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn rust_log_raises_core_log_level() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .env("RUST_LOG", "passpilot_core=debug")
        .args(["query", "--query", "merge sort", "--format", "json", "--data-dir"])
        .arg(sample_data())
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("hit(s) at threshold"));
}

#[test]
fn default_log_level_hides_debug() {
    let sandbox = TempDir::new().unwrap();
    passpilot(&sandbox)
        .args(["query", "--query", "merge sort", "--data-dir"])
        .arg(sample_data())
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").not())
        .stderr(predicate::str::contains("exam analyzer ready"));
}
