//! Branch references and HEAD
//!
//! Branches are named files under `refs/heads/` holding a commit id. HEAD is
//! persisted as two records:
//!
//! - `HEAD`: `ref: refs/heads/<branch>`, the active branch
//! - `HEAD_OID`: the active commit id
//!
//! Both always agree with the active branch's ref file. Updates write the
//! branch ref first and the HEAD records last, so an interrupted update leaves
//! the branch ref as the most recent value; `read_head` trusts it when the
//! records disagree.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";
pub const HEAD_OID_REF_NAME: &str = "HEAD_OID";

/// Active branch together with the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Head {
    pub branch: BranchName,
    pub commit: ObjectId,
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository metadata directory (typically `.gitlet`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn head_oid_path(&self) -> Box<Path> {
        self.path.join(HEAD_OID_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.heads_path().join(name.as_ref()).into_boxed_path()
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    /// Read the commit id a branch points at
    ///
    /// # Returns
    ///
    /// Some(ObjectId) if the branch exists, None otherwise
    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let path = self.branch_path(name);
        if !path.is_file() {
            return Ok(None);
        }

        Self::read_oid_file(&path).map(Some)
    }

    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            return Err(Error::BranchAlreadyExists(name.to_string()).into());
        }

        self.update_ref_file(self.branch_path(name), oid.as_ref())?;
        tracing::info!(branch = %name, commit = %oid, "created branch");

        Ok(())
    }

    /// Point an existing or new branch at `oid`, overwriting its previous value.
    pub fn move_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(self.branch_path(name), oid.as_ref())
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(name)?
            .ok_or_else(|| Error::BranchNotFound(name.to_string()))?;

        if &self.current_branch()? == name {
            return Err(Error::CannotRemoveCurrentBranch(name.to_string()).into());
        }

        let branch_path = self.branch_path(name);
        std::fs::remove_file(branch_path.as_ref())
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(branch_path.as_ref())?;
        tracing::info!(branch = %name, commit = %oid, "deleted branch");

        Ok(oid)
    }

    /// All branch names in sorted order
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        WalkDir::new(&heads_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative_path = entry.path().strip_prefix(heads_path.as_ref())?;
                BranchName::try_parse(relative_path.to_string_lossy().replace('\\', "/"))
            })
            .collect()
    }

    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read {:?}", head_path))?;

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content.trim())
            .with_context(|| format!("HEAD is not a symbolic ref: {}", content.trim()))?;

        BranchName::try_parse_ref_path(&symref_match[1])
    }

    pub fn set_current_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path(), &format!("ref: {}", name.to_ref_path()))
    }

    pub fn head_commit_id(&self) -> anyhow::Result<ObjectId> {
        Self::read_oid_file(&self.head_oid_path())
    }

    pub fn set_head_commit_id(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(self.head_oid_path(), oid.as_ref())
    }

    pub fn read_head(&self) -> anyhow::Result<Head> {
        let branch = self.current_branch()?;
        let branch_oid = self
            .read_branch(&branch)?
            .ok_or_else(|| Error::BranchNotFound(branch.to_string()))?;

        let head_oid = self.head_commit_id().ok();
        if head_oid.as_ref() != Some(&branch_oid) {
            tracing::warn!(
                branch = %branch,
                branch_commit = %branch_oid,
                head_commit = ?head_oid,
                "HEAD records disagree, using the branch ref"
            );
        }

        Ok(Head::new(branch, branch_oid))
    }

    /// Move HEAD, writing the branch ref before both HEAD records.
    pub fn update_head(&self, head: &Head) -> anyhow::Result<()> {
        self.move_branch(&head.branch, &head.commit)?;
        self.set_head_commit_id(&head.commit)?;
        self.set_current_branch(&head.branch)?;
        tracing::info!(branch = %head.branch, commit = %head.commit, "moved HEAD");

        Ok(())
    }

    fn read_oid_file(path: &Path) -> anyhow::Result<ObjectId> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;

        ObjectId::try_parse(content.trim().to_string())
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Commit;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    fn oid(seed: &str) -> ObjectId {
        ObjectId::digest([seed.as_bytes()])
    }

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().join(".gitlet").into_boxed_path());
        let root = Commit::root().unwrap();
        refs.update_head(&Head::new(BranchName::default_branch(), root.oid().clone()))
            .unwrap();
        (dir, refs)
    }

    #[rstest]
    fn head_reads_back_what_was_written(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        let head = refs.read_head().unwrap();

        assert_eq!(head.branch, BranchName::default_branch());
        assert_eq!(&head.commit, Commit::root().unwrap().oid());
        assert_eq!(refs.head_commit_id().unwrap(), head.commit);
        assert_eq!(refs.list_branches().unwrap(), vec![branch("main")]);
    }

    #[rstest]
    fn duplicate_branch_is_rejected(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&branch("feature"), &oid("a")).unwrap();

        let error = refs.create_branch(&branch("feature"), &oid("b")).unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::BranchAlreadyExists("feature".to_string()))
        );
        assert_eq!(refs.read_branch(&branch("feature")).unwrap(), Some(oid("a")));
    }

    #[rstest]
    fn current_branch_cannot_be_deleted(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("main")).unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::CannotRemoveCurrentBranch("main".to_string()))
        );

        let error = refs.delete_branch(&branch("missing")).unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::BranchNotFound("missing".to_string()))
        );
    }

    #[rstest]
    fn nested_branch_deletion_prunes_empty_directories(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&branch("feature/x"), &oid("a")).unwrap();
        assert_eq!(
            refs.list_branches().unwrap(),
            vec![branch("feature/x"), branch("main")]
        );

        assert_eq!(refs.delete_branch(&branch("feature/x")).unwrap(), oid("a"));
        assert!(!refs.heads_path().join("feature").exists());
    }

    #[rstest]
    fn branch_ref_wins_over_stale_head_oid(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        // simulate an update interrupted after the branch ref was written
        refs.move_branch(&branch("main"), &oid("newer")).unwrap();

        let head = refs.read_head().unwrap();
        assert_eq!(head.commit, oid("newer"));
    }
}
