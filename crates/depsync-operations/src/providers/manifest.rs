use crate::traits::ManifestProvider;
use crate::{ProjectLayout, Result};

pub struct FileSystemManifestProvider;

impl FileSystemManifestProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemManifestProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestProvider for FileSystemManifestProvider {
    fn published_name(&self, layout: &ProjectLayout, package: &str) -> Result<String> {
        Ok(depsync_manifest::published_name(
            &layout.root,
            &layout.packages_dir,
            package,
        )?)
    }
}
