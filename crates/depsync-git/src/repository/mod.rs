mod diff;
mod merge_base;
mod remote;

use std::path::{Path, PathBuf};

use crate::{GitError, Result};

pub use diff::ManifestDiffOptions;

pub struct Repository {
    pub(crate) inner: git2::Repository,
    root: PathBuf,
}

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if the path is not inside a git repository.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let root = inner.workdir().ok_or_else(|| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        // Use dunce to get a path without the \\?\ prefix on Windows
        let root = dunce::simplified(root).to_path_buf();

        Ok(Self { inner, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a revision, falling back to `origin/<refspec>` for branches
    /// that only exist on the remote.
    pub(crate) fn resolve_object(&self, refspec: &str) -> Result<git2::Object<'_>> {
        if let Ok(object) = self.inner.revparse_single(refspec) {
            return Ok(object);
        }

        let remote_ref = format!("origin/{refspec}");
        let object = self
            .inner
            .revparse_single(&remote_ref)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;
        tracing::debug!(refspec, %remote_ref, "resolved revision through remote branch");
        Ok(object)
    }
}
