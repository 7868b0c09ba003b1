use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let head_commit = self.head_commit()?;

        let status = StatusInfo::inspect(
            self.refs().list_branches()?,
            self.refs().current_branch()?,
            head_commit.tree(),
            &self.index(),
            self.workspace(),
        )?;

        status.write_report(&mut *self.writer())
    }
}
