use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;

fn postsync_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("postsync"))
}

#[test]
fn prints_one_slug_per_name() {
    let assert = postsync_cmd()
        .args(["slug", "Hello World", "C++ Tips", "Rust 2024!"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");

    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["hello-world", "c-tips", "rust-2024"]
    );
}

#[test]
fn punctuation_only_name_gives_empty_line() {
    postsync_cmd()
        .args(["slug", "!!!"])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn requires_at_least_one_name() {
    postsync_cmd()
        .arg("slug")
        .assert()
        .failure()
        .stderr(contains("required"));
}

#[test]
fn slug_needs_no_platform_settings() {
    postsync_cmd()
        .env_remove("HASHNODE_HOST")
        .env_remove("HASHNODE_PAT")
        .args(["slug", "X Y"])
        .assert()
        .success()
        .stdout("x-y\n");
}
