use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn collsync() -> Command {
    Command::cargo_bin("collsync").expect("collsync binary")
}

#[test]
fn status_reports_missing_api_key() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MEDIACLOUD_API_KEY"));
}

#[test]
fn status_reports_resolved_config() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .env("MEDIACLOUD_API_KEY", "k-1234")
        .env("COLLSYNC_RETRIES", "2")
        .arg("status")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("api_url=https://api.mediacloud.org/api/v2")
                .and(predicate::str::contains("retries=2"))
                .and(predicate::str::contains("api_key=set")),
        );
}

#[test]
fn status_never_echoes_the_api_key() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .env("MEDIACLOUD_API_KEY", "super-secret-key")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("super-secret-key").not());
}

#[test]
fn status_flags_unrecognized_env_vars() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .env("MEDIACLOUD_API_KEY", "k-1234")
        .env("COLLSYNC_RETIRES", "3")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("COLLSYNC_RETIRES"));
}

#[test]
fn status_json_mode_emits_a_report_object() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .env("MEDIACLOUD_API_KEY", "k-1234")
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"command\": \"status\"")
                .and(predicate::str::contains("\"ok\": true")),
        );
}
