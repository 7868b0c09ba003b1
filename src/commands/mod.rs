//! Command implementations
//!
//! - `porcelain`: User-facing commands (init, add, commit, log, switch, ...)

pub mod porcelain;
