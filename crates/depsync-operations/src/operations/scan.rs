use std::borrow::Cow;

use depsync_diff::{ManifestDiffScanner, PackageChanges};
use depsync_git::ManifestDiffOptions;
use tracing::{debug, info, warn};

use crate::traits::{GitProvider, ManifestProvider};
use crate::{ProjectLayout, Result};

pub const DEFAULT_BASE: &str = "main";
pub const DEFAULT_CONTEXT_LINES: u32 = 9999;

pub struct ScanInput {
    /// Branch the pending changes will merge into.
    pub base: String,
    /// Revision holding the changes; `None` means the working tree.
    pub head: Option<String>,
    /// Pre-computed diff text that replaces the git lookup.
    pub diff: Option<String>,
    pub context_lines: u32,
}

impl Default for ScanInput {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            head: None,
            diff: None,
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

pub struct ScanOperation<G, M> {
    git_provider: G,
    manifest_provider: M,
}

impl<G, M> ScanOperation<G, M>
where
    G: GitProvider,
    M: ManifestProvider,
{
    pub fn new(git_provider: G, manifest_provider: M) -> Self {
        Self {
            git_provider,
            manifest_provider,
        }
    }

    /// Collects the dependency bumps of every changed package and resolves
    /// their published names. Packages whose manifest cannot be read keep
    /// their directory name.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge base or the manifest diff cannot be
    /// computed.
    pub fn execute(&self, layout: &ProjectLayout, input: &ScanInput) -> Result<PackageChanges> {
        let diff: Cow<'_, str> = match &input.diff {
            Some(diff) => Cow::Borrowed(diff),
            None => Cow::Owned(self.pending_diff(layout, input)?),
        };

        let mut changes = ManifestDiffScanner::new(layout.packages_dir.as_str()).scan(&diff);

        for change_set in changes.values_mut() {
            match self
                .manifest_provider
                .published_name(layout, &change_set.package)
            {
                Ok(name) => change_set.published_name = name,
                Err(err) => warn!(
                    package = %change_set.package,
                    error = %err,
                    "could not resolve published name, using directory name"
                ),
            }
        }

        info!(packages = changes.len(), "scanned manifest diff");
        Ok(changes)
    }

    fn pending_diff(&self, layout: &ProjectLayout, input: &ScanInput) -> Result<String> {
        let head = input.head.as_deref().unwrap_or("HEAD");
        let merge_base = self
            .git_provider
            .merge_base(layout.root(), &input.base, head)?;
        debug!(base = %input.base, head, %merge_base, "diffing against merge base");

        let options = ManifestDiffOptions::for_packages_dir(&layout.packages_dir)
            .with_context_lines(input.context_lines);
        self.git_provider.manifest_diff(
            layout.root(),
            &merge_base,
            input.head.as_deref(),
            &options,
        )
    }
}
