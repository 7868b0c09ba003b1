//! Working tree synchronization
//!
//! Moving HEAD between commits plans every file system change up front and
//! rejects the whole move if an untracked file would be lost.

pub mod migration;
