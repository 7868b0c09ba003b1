use crate::common::command::{repository_dir, run_gitlet_command, stdout_of};
use crate::common::{read_branch, read_head_oid};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_root_commit_and_main_branch(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    repository_dir.child(".gitlet/objects").assert(predicate::path::is_dir());
    repository_dir.child(".gitlet/staging/add").assert(predicate::path::is_dir());
    repository_dir.child(".gitlet/staging/remove").assert(predicate::path::is_dir());
    repository_dir
        .child(".gitlet/HEAD")
        .assert("ref: refs/heads/main");

    let root = read_branch(repository_dir.path(), "main");
    assert_eq!(root.len(), 40);
    assert_eq!(read_head_oid(repository_dir.path()), root);
}

#[rstest]
fn root_commit_id_is_the_same_in_every_repository() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    run_gitlet_command(first.path(), &["init"]).assert().success();
    run_gitlet_command(second.path(), &["init"]).assert().success();

    assert_eq!(
        read_branch(first.path(), "main"),
        read_branch(second.path(), "main")
    );
}

#[rstest]
fn init_over_existing_repository_fails(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let root = read_branch(repository_dir.path(), "main");

    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A Gitlet version-control system already exists in the current directory.",
        ));

    assert_eq!(read_branch(repository_dir.path(), "main"), root);
}

#[rstest]
#[case::status(&["status"])]
#[case::log(&["log"])]
#[case::add(&["add", "a.txt"])]
#[case::commit(&["commit", "message"])]
#[case::branch(&["branch", "feature"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_gitlet_command(repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Not in an initialized Gitlet directory.",
        ));

    repository_dir.child(".gitlet").assert(predicate::path::missing());
}

#[rstest]
fn work_tree_option_selects_the_repository(repository_dir: TempDir) {
    let elsewhere = TempDir::new().unwrap();
    let work_tree = repository_dir.path().to_string_lossy().to_string();

    run_gitlet_command(elsewhere.path(), &["--work-tree", &work_tree, "init"])
        .assert()
        .success();
    repository_dir.child(".gitlet").assert(predicate::path::is_dir());
    elsewhere.child(".gitlet").assert(predicate::path::missing());

    let mut log = run_gitlet_command(elsewhere.path(), &["log"]);
    log.env("GITLET_WORK_TREE", &work_tree);
    assert!(stdout_of(&mut log).contains("initial commit"));
}
