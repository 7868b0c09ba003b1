//! Version-control data structures and algorithms
//!
//! - `branch`: Validated branch names
//! - `checkout`: Working tree migration and untracked file conflict detection
//! - `log`: First-parent history traversal
//! - `objects`: Object types (blob, commit) and their identifiers
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod log;
pub mod objects;
pub mod status;
