//! Repository areas
//!
//! Each area is loaded and saved independently:
//!
//! - `database`: Content-addressed store for blobs and commits
//! - `index`: Staging area with pending additions and removals
//! - `refs`: Branch pointers and HEAD
//! - `workspace`: Working tree file system operations
//! - `repository`: Façade coordinating the areas for each command

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
