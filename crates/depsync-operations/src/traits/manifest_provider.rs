use crate::ProjectLayout;
use crate::Result;

pub trait ManifestProvider: Send + Sync {
    /// Published `name` of the package in `<packages_dir>/<package>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read, parsed, or has no name.
    fn published_name(&self, layout: &ProjectLayout, package: &str) -> Result<String>;
}
