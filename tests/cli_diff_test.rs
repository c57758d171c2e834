use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn collsync() -> Command {
    Command::cargo_bin("collsync").expect("collsync binary")
}

#[test]
fn diff_requires_an_api_key_before_touching_the_network() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .args(["diff", "1", "--sources", "1,2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MEDIACLOUD_API_KEY"));
}

#[test]
fn diff_rejects_non_numeric_member_ids() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .args(["diff", "1", "--sources", "1,x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid member id: x"));
}

#[test]
fn members_requires_at_least_one_collection_id() {
    let tmp = tempdir().expect("tempdir");

    collsync()
        .current_dir(tmp.path())
        .env_clear()
        .env("HOME", tmp.path())
        .arg("members")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
