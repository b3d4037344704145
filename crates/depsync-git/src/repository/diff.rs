use crate::{GitError, Result};

use super::Repository;

const DEFAULT_CONTEXT_LINES: u32 = 9999;

/// Which files to diff and how much context to keep around each change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDiffOptions {
    pub pathspecs: Vec<String>,
    pub context_lines: u32,
}

impl Default for ManifestDiffOptions {
    fn default() -> Self {
        Self::for_packages_dir("packages")
    }
}

impl ManifestDiffOptions {
    #[must_use]
    pub fn for_packages_dir(packages_dir: &str) -> Self {
        Self {
            pathspecs: vec![format!("{packages_dir}/*/package.json")],
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    #[must_use]
    pub fn with_context_lines(mut self, context_lines: u32) -> Self {
        self.context_lines = context_lines;
        self
    }
}

impl Repository {
    /// Unified patch text of the manifests that differ between `base` and
    /// `head`, or between `base` and the working tree when `head` is `None`.
    /// Identical trees produce an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if a revision cannot be resolved, or
    /// [`GitError::Git`] if the diff cannot be computed.
    pub fn manifest_diff(
        &self,
        base: &str,
        head: Option<&str>,
        options: &ManifestDiffOptions,
    ) -> Result<String> {
        let base_tree = self.resolve_tree(base)?;

        let mut diff_opts = git2::DiffOptions::new();
        diff_opts.context_lines(options.context_lines);
        for pathspec in &options.pathspecs {
            diff_opts.pathspec(pathspec);
        }

        let diff = match head {
            Some(head) => {
                let head_tree = self.resolve_tree(head)?;
                self.inner
                    .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut diff_opts))?
            }
            None => self
                .inner
                .diff_tree_to_workdir_with_index(Some(&base_tree), Some(&mut diff_opts))?,
        };

        let mut patch = String::new();
        diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
            let content = String::from_utf8_lossy(line.content());
            match line.origin() {
                origin @ ('+' | '-' | ' ') => {
                    patch.push(origin);
                    patch.push_str(&content);
                }
                _ => patch.push_str(&content),
            }
            true
        })?;

        tracing::debug!(
            base,
            files = diff.deltas().count(),
            bytes = patch.len(),
            "computed manifest diff"
        );
        Ok(patch)
    }

    fn resolve_tree(&self, refspec: &str) -> Result<git2::Tree<'_>> {
        self.resolve_object(refspec)?
            .peel_to_tree()
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })
    }
}
