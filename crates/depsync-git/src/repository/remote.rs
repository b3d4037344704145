use crate::{Repository, Result};

const DEFAULT_REMOTE: &str = "origin";

impl Repository {
    /// URL of the `origin` remote, if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote configuration cannot be read.
    pub fn remote_url(&self) -> Result<Option<String>> {
        match self.inner.find_remote(DEFAULT_REMOTE) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(err) if err.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
