use std::path::Path;

use crate::error::ManifestError;
use crate::manifest::{MANIFEST_FILE, read_manifest};

/// The `name` field of `<root>/<packages_dir>/<dir_name>/package.json`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or
/// `ManifestError::MissingField` if it has no `name`.
pub fn published_name(
    root: &Path,
    packages_dir: &str,
    dir_name: &str,
) -> Result<String, ManifestError> {
    let path = root.join(packages_dir).join(dir_name).join(MANIFEST_FILE);
    read_manifest(&path)?
        .name
        .ok_or(ManifestError::MissingField { path, field: "name" })
}
