mod error;
mod repository;

pub use error::GitError;
pub use repository::{ManifestDiffOptions, Repository};

pub type Result<T> = std::result::Result<T, GitError>;
