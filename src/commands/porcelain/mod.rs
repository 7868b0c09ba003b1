//! Porcelain commands
//!
//! Each command is an `impl Repository` block orchestrating the object
//! database, staging index, refs and workspace for one user operation.
//!
//! ## Commands
//!
//! - `init`: Create the repository and its root commit
//! - `add`: Stage files for commit
//! - `commit`: Record staged changes
//! - `remove`: Unstage or stage the removal of a file
//! - `log`: Show the first-parent history, or every commit
//! - `find`: Look up commits by message
//! - `status`: Show branches, staged changes and working tree state
//! - `branch`: Create a branch
//! - `switch`: Change the current branch
//! - `remove_branch`: Delete a branch
//! - `reset`: Move the current branch to an arbitrary commit
//! - `restore`: Bring back one file from a commit

pub mod add;
pub mod branch;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod remove;
pub mod remove_branch;
pub mod reset;
pub mod restore;
pub mod status;
pub mod switch;
