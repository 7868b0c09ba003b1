use crate::areas::repository::Repository;
use std::path::Path;

impl Repository {
    /// Unstage `path`, and if HEAD tracks it, stage its removal and delete the
    /// working copy.
    pub fn remove(&mut self, path: &Path) -> anyhow::Result<()> {
        let path = self.workspace().relative_path(path)?;
        let head_commit = self.head_commit()?;

        let tracked_content = match head_commit.tree().get(&path) {
            Some(blob_oid) => Some(self.database().load_blob(blob_oid)?),
            None => None,
        };
        let is_tracked = tracked_content.is_some();

        let mut index = self.index();
        index.stage_remove(&path, tracked_content)?;

        if is_tracked {
            self.workspace().remove_file(&path)?;
        }

        index.write_updates()
    }
}
