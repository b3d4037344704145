use std::path::Path;

use depsync_git::ManifestDiffOptions;

use crate::Result;

pub trait GitProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or either revision
    /// cannot be resolved.
    fn merge_base(&self, project_root: &Path, base: &str, head: &str) -> Result<String>;

    /// Unified diff text of package manifests; `head = None` diffs against the
    /// working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or the diff fails.
    fn manifest_diff(
        &self,
        project_root: &Path,
        base: &str,
        head: Option<&str>,
        options: &ManifestDiffOptions,
    ) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn remote_url(&self, project_root: &Path) -> Result<Option<String>>;
}
