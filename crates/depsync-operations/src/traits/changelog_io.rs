use std::path::Path;

use crate::Result;

pub trait ChangelogIo: Send + Sync {
    fn changelog_exists(&self, path: &Path) -> bool;

    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read.
    fn read_changelog(&self, path: &Path) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the changelog cannot be written.
    fn write_changelog(&self, path: &Path, content: &str) -> Result<()>;
}
