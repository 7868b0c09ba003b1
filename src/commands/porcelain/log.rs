use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the first-parent history of HEAD, newest first.
    pub fn log(&self) -> anyhow::Result<()> {
        let head_commit = self.head_commit()?;

        for commit in self.history(&head_commit) {
            self.display_commit(&commit?)?;
        }

        Ok(())
    }

    /// Print every commit ever made, in storage order.
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit in self.database().commits() {
            self.display_commit(&commit?)?;
        }

        Ok(())
    }

    pub fn display_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "{}", format!("commit {}", commit.oid()).yellow())?;
        if let [first, second, ..] = commit.parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
