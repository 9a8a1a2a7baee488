use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> (bool, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_opinio"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str = String::from_utf8(output.stdout).expect("failed to convert stdout to string");

    (output.status.success(), stdout_str)
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "population_size = 50\n"
        + "red_proportion = 0.6\n"
        + "red_zealot_fraction = 0.1\n"
        + "blue_zealot_fraction = 0.1\n"
        + "homophily = 0.7\n"
        + "max_interactions = 2000\n"
        + "progress_interval = 500\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let (success, stdout) = run_bin(&["--config", config_str, "--seed", "42", "run"]);
    assert!(success, "run failed:\n{stdout}");
    let stats: serde_json::Value = serde_json::from_str(&stdout).expect("invalid run output");
    assert_eq!(stats["is_complete"], true);
    assert_eq!(
        stats["red_count"].as_u64().unwrap() + stats["blue_count"].as_u64().unwrap(),
        50
    );

    let (success, stdout_again) = run_bin(&["--config", config_str, "--seed", "42", "run"]);
    assert!(success);
    assert_eq!(stdout, stdout_again);

    let (success, stdout) = run_bin(&[
        "--config", config_str, "--seed", "7", "batch", "--runs", "4",
    ]);
    assert!(success, "batch failed:\n{stdout}");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("invalid batch output");
    assert_eq!(report["n_runs"], 4);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("invalid_config_fails");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, "homophily = 1.5\n").expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let (success, _) = run_bin(&["--config", config_str, "run"]);
    assert!(!success);

    let missing_path = test_dir.join("missing.toml");
    let missing_str = missing_path
        .to_str()
        .expect("failed to convert config path to string");

    let (success, _) = run_bin(&["--config", missing_str, "run"]);
    assert!(!success);

    fs::remove_dir_all(&test_dir).ok();
}
