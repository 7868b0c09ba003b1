use crate::areas::repository::Repository;
use std::io::Write;

const NO_MATCH_MESSAGE: &str = "Found no commit with that message.";

impl Repository {
    /// Print the id of every commit whose message is exactly `message`.
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let matches = self.database().find_by_message(message)?;
        let mut writer = self.writer();

        if matches.is_empty() {
            writeln!(writer, "{}", NO_MATCH_MESSAGE)?;
            return Ok(());
        }

        for commit_oid in matches {
            writeln!(writer, "{}", commit_oid)?;
        }

        Ok(())
    }
}
