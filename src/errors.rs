//! Repository error kinds
//!
//! Every user-visible failure of a command maps to one variant here. Commands
//! return `anyhow::Result` and raise these values through it, so callers can
//! recover the kind with `err.downcast_ref::<Error>()`.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist.")]
    FileNotFound(PathBuf),

    #[error("Invalid path {0:?}: only files inside the working tree can be tracked.")]
    InvalidPath(PathBuf),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(PathBuf),

    #[error("No reason to remove the file.")]
    NothingToRemove(PathBuf),

    #[error("No changes added to the commit.")]
    NoChangesToCommit,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists(String),

    #[error("No such branch exists.")]
    BranchNotFound(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("Commit id {0} is ambiguous.")]
    AmbiguousId(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict(Vec<PathBuf>),

    #[error("No need to switch to the current branch.")]
    AlreadySwitched(String),
}

/// Look up the repository error kind carried by an `anyhow::Error`, if any.
pub fn error_kind(error: &anyhow::Error) -> Option<&Error> {
    error.downcast_ref::<Error>()
}
