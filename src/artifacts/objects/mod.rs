//! Content-addressed objects
//!
//! The object store holds two kinds of objects, both identified by a SHA-1 hash:
//!
//! - **Blob**: the bytes of one tracked file, keyed by `hash(path ++ content)`
//! - **Commit**: an immutable snapshot with message, timestamp, parents and the
//!   complete `path -> blob id` tree, keyed by `hash(message ++ timestamp ++ parents)`
//!
//! On disk every object is framed as `<type> <size>\0<payload>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
