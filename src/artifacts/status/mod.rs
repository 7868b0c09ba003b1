//! Working tree status inspection
//!
//! Compares the working tree against the staging index and HEAD's tree.
//!
//! ## Components
//!
//! - `file_change`: Kinds of unstaged changes
//! - `status_info`: Status aggregation and display

pub mod file_change;
pub mod status_info;
