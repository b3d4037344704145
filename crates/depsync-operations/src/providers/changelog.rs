use std::path::Path;

use crate::Result;
use crate::traits::ChangelogIo;

pub struct FileSystemChangelogIo;

impl FileSystemChangelogIo {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemChangelogIo {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogIo for FileSystemChangelogIo {
    fn changelog_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_changelog(&self, path: &Path) -> Result<String> {
        Ok(depsync_changelog::read_changelog(path)?)
    }

    fn write_changelog(&self, path: &Path, content: &str) -> Result<()> {
        Ok(depsync_changelog::write_changelog(path, content)?)
    }
}
