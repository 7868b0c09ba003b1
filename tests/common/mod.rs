#![allow(dead_code)]

pub mod command;
pub mod file;

/// Date handed to every test commit unless a test picks its own
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

/// Read the commit id a branch points at straight from the ref file
pub fn read_branch(dir: &std::path::Path, branch: &str) -> String {
    std::fs::read_to_string(dir.join(".gitlet/refs/heads").join(branch))
        .unwrap_or_else(|e| panic!("Failed to read branch {}: {}", branch, e))
        .trim()
        .to_string()
}

pub fn read_head_oid(dir: &std::path::Path) -> String {
    std::fs::read_to_string(dir.join(".gitlet/HEAD_OID"))
        .expect("Failed to read HEAD_OID")
        .trim()
        .to_string()
}
