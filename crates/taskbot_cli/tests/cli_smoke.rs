use std::process::Command;

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_taskbot");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run taskbot --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
    assert!(stdout.contains("delete"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let exe = env!("CARGO_BIN_EXE_taskbot");
    let output = Command::new(exe)
        .arg("complete")
        .output()
        .expect("failed to run taskbot complete");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: validation_error"));
}

#[test]
fn run_without_token_fails_fast() {
    let exe = env!("CARGO_BIN_EXE_taskbot");
    let config_path = std::env::temp_dir().join("taskbot-missing-config-for-run.json");
    let output = Command::new(exe)
        .arg("run")
        .env_remove("TELEGRAM_TOKEN")
        .env("TASKBOT_CONFIG_PATH", &config_path)
        .env("TASKBOT_STORE_PATH", std::env::temp_dir().join("taskbot-run.json"))
        .output()
        .expect("failed to run taskbot run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bot token is not configured"));
}
