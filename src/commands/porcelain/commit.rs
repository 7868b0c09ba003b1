use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::errors::Error;

impl Repository {
    /// Record the staged changes on top of HEAD and advance the current branch.
    ///
    /// Blobs and the commit object are stored before the staging index is
    /// cleared; the refs move last.
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        if index.is_empty() {
            return Err(Error::NoChangesToCommit.into());
        }

        let head = self.refs().read_head()?;
        let parent = self.database().load_commit(&head.commit)?;

        let commit = Commit::new(
            message.to_string(),
            vec![head.commit.clone()],
            Commit::timestamp_from_env(),
            index.apply_to(parent.tree()),
        )?;

        for (path, content) in index.additions() {
            self.database().put_blob(path, content.clone())?;
        }
        self.database().store(&commit)?;

        index.clear();
        index.write_updates()?;

        self.refs()
            .update_head(&Head::new(head.branch, commit.oid().clone()))?;
        tracing::info!(commit = %commit.oid(), parent = %head.commit, "created commit");

        Ok(())
    }
}
