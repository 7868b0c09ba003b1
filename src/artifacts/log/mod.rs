//! Commit history traversal
//!
//! - `rev_list`: first-parent walk from a starting commit down to the root

pub mod rev_list;
