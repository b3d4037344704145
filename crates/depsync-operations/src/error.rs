use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Git(#[from] depsync_git::GitError),

    #[error(transparent)]
    Manifest(#[from] depsync_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] depsync_changelog::ChangelogError),

    #[error("entry '{entry}' not found in section {section}")]
    EntryNotFound { section: String, entry: String },
}

pub type Result<T> = std::result::Result<T, OperationError>;
