use std::path::Path;

use crate::error::ChangelogError;

/// # Errors
///
/// Returns `ChangelogError::Read` if the file cannot be read.
pub fn read_changelog(path: &Path) -> Result<String, ChangelogError> {
    std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// # Errors
///
/// Returns `ChangelogError::Write` if the file cannot be written.
pub fn write_changelog(path: &Path, content: &str) -> Result<(), ChangelogError> {
    std::fs::write(path, content).map_err(|source| ChangelogError::Write {
        path: path.to_path_buf(),
        source,
    })
}
