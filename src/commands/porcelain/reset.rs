use crate::areas::repository::Repository;

impl Repository {
    /// Check out the commit named by a full or abbreviated id and move the
    /// current branch to it.
    pub fn reset(&mut self, commit_id: &str) -> anyhow::Result<()> {
        let target = self.resolve_commit(commit_id)?;
        let current_branch = self.refs().current_branch()?;

        self.move_head(current_branch, &target)
    }
}
