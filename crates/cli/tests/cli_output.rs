use std::process::Command;

use serde_json::Value;

fn dottie() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_dottie"));
    command
        .env_remove("DOTTIE_DATABASE_URL")
        .env("RUST_LOG", "info");
    command
}

#[test]
fn classify_prints_only_json_on_stdout() {
    let output = dottie()
        .args([
            "classify",
            "--age",
            "18-24",
            "--cycle-length",
            "26-30",
            "--flow",
            "very-heavy",
        ])
        .output()
        .expect("dottie should run");

    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("stdout is one JSON document");
    assert_eq!(parsed["pattern"], "heavy");
    assert!(String::from_utf8_lossy(&output.stderr).contains("assessment classified"));
}

#[test]
fn seed_names_the_pattern_title() {
    let output = dottie()
        .args(["seed", "pain"])
        .output()
        .expect("dottie should run");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Pain-Predominant Pattern"));
}
