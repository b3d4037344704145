use std::path::Path;

use depsync_git::{ManifestDiffOptions, Repository};

use crate::Result;
use crate::traits::GitProvider;

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for Git2Provider {
    fn merge_base(&self, project_root: &Path, base: &str, head: &str) -> Result<String> {
        let repo = Repository::open(project_root)?;
        Ok(repo.merge_base(base, head)?)
    }

    fn manifest_diff(
        &self,
        project_root: &Path,
        base: &str,
        head: Option<&str>,
        options: &ManifestDiffOptions,
    ) -> Result<String> {
        let repo = Repository::open(project_root)?;
        Ok(repo.manifest_diff(base, head, options)?)
    }

    fn remote_url(&self, project_root: &Path) -> Result<Option<String>> {
        let repo = Repository::open(project_root)?;
        Ok(repo.remote_url()?)
    }
}
