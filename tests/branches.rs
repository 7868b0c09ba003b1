use crate::common::command::{committed_repository_dir, gitlet_commit, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::read_branch;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn new_branch_points_at_head_without_switching(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();

    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();

    assert_eq!(read_branch(dir, "feature"), read_branch(dir, "main"));
    committed_repository_dir
        .child(".gitlet/HEAD")
        .assert("ref: refs/heads/main");
}

#[rstest]
fn branch_does_not_follow_later_commits(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();
    let before = read_branch(dir, "main");

    write_file(FileSpec::new(dir.join("1.txt"), "uno".to_string()));
    run_gitlet_command(dir, &["add", "1.txt"]).assert().success();
    gitlet_commit(dir, "translate").assert().success();

    assert_eq!(read_branch(dir, "feature"), before);
    assert_ne!(read_branch(dir, "main"), before);
}

#[rstest]
fn duplicate_branch_is_rejected(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();

    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch with that name already exists.",
        ));
}

#[rstest]
#[case("bad..name")]
#[case("trailing/")]
#[case("with space")]
#[case(".hidden")]
fn invalid_branch_names_are_rejected(committed_repository_dir: TempDir, #[case] name: &str) {
    run_gitlet_command(committed_repository_dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));
}

#[rstest]
fn hierarchical_branch_names_are_supported(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();

    run_gitlet_command(dir, &["branch", "feature/login"])
        .assert()
        .success();
    assert_eq!(read_branch(dir, "feature/login"), read_branch(dir, "main"));

    run_gitlet_command(dir, &["rm-branch", "feature/login"])
        .assert()
        .success();
    committed_repository_dir
        .child(".gitlet/refs/heads/feature")
        .assert(predicate::path::missing());
}

#[rstest]
fn removing_a_branch_keeps_its_commits(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();
    let commit = read_branch(dir, "feature");

    run_gitlet_command(dir, &["remove-branch", "feature"])
        .assert()
        .success();

    committed_repository_dir
        .child(".gitlet/refs/heads/feature")
        .assert(predicate::path::missing());
    committed_repository_dir
        .child(format!(".gitlet/objects/{}/{}", &commit[..2], &commit[2..]))
        .assert(predicate::path::is_file());
}

#[rstest]
fn current_branch_cannot_be_removed(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["remove-branch", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot remove the current branch."));

    committed_repository_dir
        .child(".gitlet/refs/heads/main")
        .assert(predicate::path::is_file());
}

#[rstest]
fn removing_a_missing_branch_fails(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["remove-branch", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such branch exists."));
}
