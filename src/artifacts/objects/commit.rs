//! Commit object
//!
//! Commits are immutable snapshots of every tracked file. They contain:
//! - The commit message
//! - Parent commit ID(s), empty only for the root commit
//! - A second-precision timestamp with its UTC offset
//! - The complete tree: tracked path -> blob id, ordered by path
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! timestamp <rfc3339>
//! blob <blob-sha> <path>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Error;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;

/// Message of the commit every repository starts from
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";

/// Complete snapshot of tracked files: path -> blob id
pub type CommitTree = BTreeMap<PathBuf, ObjectId>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    oid: ObjectId,
    message: String,
    /// Parent commit IDs (empty for the root commit)
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    tree: CommitTree,
}

impl Commit {
    /// Create a new commit
    ///
    /// The timestamp is truncated to whole seconds so the id can be recomputed
    /// from the stored record.
    pub fn new(
        message: String,
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        tree: CommitTree,
    ) -> anyhow::Result<Self> {
        if message.trim().is_empty() {
            return Err(Error::EmptyMessage.into());
        }

        let timestamp = timestamp
            .with_nanosecond(0)
            .context("Unable to truncate commit timestamp")?;
        let oid = Self::compute_id(&message, &timestamp, &parents);

        Ok(Commit {
            oid,
            message,
            parents,
            timestamp,
            tree,
        })
    }

    /// The parentless commit created by `init`
    ///
    /// Its timestamp is the epoch, so its id is the same in every repository.
    pub fn root() -> anyhow::Result<Self> {
        let epoch = DateTime::from_timestamp(0, 0)
            .context("Unable to build the epoch timestamp")?
            .fixed_offset();

        Self::new(
            ROOT_COMMIT_MESSAGE.to_string(),
            Vec::new(),
            epoch,
            CommitTree::new(),
        )
    }

    /// Timestamp for a new commit
    ///
    /// Reads `GITLET_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls
    /// back to the current local time.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date_str| {
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    fn compute_id(
        message: &str,
        timestamp: &DateTime<FixedOffset>,
        parents: &[ObjectId],
    ) -> ObjectId {
        let timestamp = Self::format_timestamp(timestamp);
        let parents = parents
            .iter()
            .map(|parent| parent.as_ref())
            .collect::<Vec<_>>()
            .join(",");

        ObjectId::digest([message.as_bytes(), timestamp.as_bytes(), parents.as_bytes()])
    }

    fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn tree(&self) -> &CommitTree {
        &self.tree
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 01 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %d %H:%M:%S %Y %z").to_string()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        for parent in &self.parents {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!(
            "timestamp {}",
            Self::format_timestamp(&self.timestamp)
        ));
        for (path, blob_oid) in &self.tree {
            // one entry per line, so the path must be text without line breaks
            let path = path
                .to_str()
                .filter(|path| !path.contains(['\n', '\r']))
                .with_context(|| format!("Path cannot be recorded in a commit: {:?}", path))?;
            object_content.push(format!("blob {} {}", blob_oid, path));
        }
        object_content.push(String::new());
        object_content.push(self.message.clone());

        Ok(Bytes::from(object_content.join("\n")))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        // header lines are never empty, so the first blank line ends them
        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut tree = CommitTree::new();

        for line in header.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit object line: {line}"))?;

            match key {
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "timestamp" => {
                    timestamp = Some(
                        DateTime::parse_from_rfc3339(value)
                            .with_context(|| format!("Invalid commit timestamp: {value}"))?,
                    )
                }
                "blob" => {
                    let (blob_oid, path) = value
                        .split_once(' ')
                        .with_context(|| format!("Invalid commit tree entry: {value}"))?;
                    tree.insert(
                        PathBuf::from(path),
                        ObjectId::try_parse(blob_oid.to_string())?,
                    );
                }
                _ => anyhow::bail!("Invalid commit object: unknown field {key}"),
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing timestamp line")?;

        Self::new(message.to_string(), parents, timestamp, tree)
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn object_id(&self) -> ObjectId {
        self.oid.clone()
    }
}
