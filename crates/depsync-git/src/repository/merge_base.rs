use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Commit id of the best common ancestor of `base` and `head`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if either revision cannot be resolved,
    /// or [`GitError::NoMergeBase`] if the histories are unrelated.
    pub fn merge_base(&self, base: &str, head: &str) -> Result<String> {
        let base_id = self.resolve_commit(base)?;
        let head_id = self.resolve_commit(head)?;

        let merge_base = self
            .inner
            .merge_base(base_id, head_id)
            .map_err(|err| match err.code() {
                git2::ErrorCode::NotFound => GitError::NoMergeBase {
                    base: base.to_string(),
                    head: head.to_string(),
                },
                _ => GitError::Git(err),
            })?;

        tracing::debug!(base, head, merge_base = %merge_base, "found merge base");
        Ok(merge_base.to_string())
    }

    fn resolve_commit(&self, refspec: &str) -> Result<git2::Oid> {
        let commit = self
            .resolve_object(refspec)?
            .peel_to_commit()
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;
        Ok(commit.id())
    }
}
