use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to read configuration at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read diff file '{path}'")]
    DiffFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no repository URL found: pass --repo-url or set repository-url in depsync.toml")]
    MissingRepositoryUrl,

    #[error("invalid repository URL")]
    RepositoryUrl(#[source] depsync_changelog::ChangelogError),

    #[error("operation failed")]
    Operation(#[from] depsync_operations::OperationError),

    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),

    #[error("{packages} package(s) have missing changelog entries")]
    MissingEntries { packages: usize },

    #[error("failed to update {packages} changelog(s)")]
    UpdateFailed { packages: usize },
}

pub type Result<T> = std::result::Result<T, CliError>;
