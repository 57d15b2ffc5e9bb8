//! Binary-level checks that need no backend

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn finwise(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finwise").unwrap();
    cmd.env("FINWISE_DATA_DIR", data_dir.path())
        .env_remove("FINWISE_SUPABASE_URL")
        .env_remove("FINWISE_SUPABASE_ANON_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    finwise(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("expense"))
        .stdout(predicate::str::contains("goal"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn config_works_without_backend() {
    let dir = TempDir::new().unwrap();
    finwise(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("FinWise Configuration"))
        .stdout(predicate::str::contains("Bills bucket:     bills"));
}

#[test]
fn missing_backend_url_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    finwise(&dir)
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("backend URL not set"));
}

#[test]
fn goal_set_requires_sign_in() {
    let dir = TempDir::new().unwrap();
    finwise(&dir)
        .env("FINWISE_SUPABASE_URL", "http://127.0.0.1:9")
        .env("FINWISE_SUPABASE_ANON_KEY", "anon")
        .args(["goal", "set", "8000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}
