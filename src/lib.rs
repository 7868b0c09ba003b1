//! Gitlet: a small content-addressed version-control engine
//!
//! - `areas`: the on-disk sub-stores (objects, staging index, refs, work tree)
//!   and the repository façade that owns them
//! - `artifacts`: value types and algorithms (objects, branch names, working
//!   tree migration, history traversal, status)
//! - `commands`: one `impl Repository` block per user command
//! - `errors`: user-visible error kinds

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

pub use areas::repository::Repository;
pub use errors::Error;
