use crate::areas::repository::Repository;
use crate::errors::Error;
use std::path::Path;

impl Repository {
    /// Overwrite the working copy of `path` with its content in a commit.
    ///
    /// HEAD is used when no commit id is given. Neither the staging index nor
    /// any ref is touched.
    pub fn restore(&self, commit_id: Option<&str>, path: &Path) -> anyhow::Result<()> {
        let commit = match commit_id {
            Some(commit_id) => self.resolve_commit(commit_id)?,
            None => self.head_commit()?,
        };

        let path = self.workspace().relative_path(path)?;
        let blob_oid = commit
            .tree()
            .get(&path)
            .ok_or_else(|| Error::FileNotInCommit(path.clone()))?;

        let content = self.database().load_blob(blob_oid)?;
        self.workspace().write_file(&path, &content)?;
        tracing::debug!(path = ?path, commit = %commit.oid(), "restored file");

        Ok(())
    }
}
