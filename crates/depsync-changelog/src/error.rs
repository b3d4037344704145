use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("failed to read changelog at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write changelog at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse URL '{url}'")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid repository path in URL '{url}': expected owner/repo format")]
    InvalidRepositoryPath { url: String },

    #[error("invalid changelog format: missing '# Changelog' title")]
    MissingTitle,

    #[error("failed to parse version '{version}'")]
    VersionParse {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("line {line}: unrecognized section heading '{heading}'")]
    InvalidHeading { line: usize, heading: String },

    #[error("line {line}: duplicate section '{label}'")]
    DuplicateSection { line: usize, label: String },

    #[error("line {line}: unknown change category '{category}'")]
    UnknownCategory { line: usize, category: String },

    #[error("line {line}: change entry outside of a change category")]
    EntryOutsideCategory { line: usize },

    #[error("line {line}: unrecognized line '{content}'")]
    UnrecognizedLine { line: usize, content: String },

    #[error("link for release '{version}' does not reference tag '{expected_tag}'")]
    TagPrefixMismatch {
        version: String,
        expected_tag: String,
    },

    #[error("no release section for version '{version}'")]
    MissingRelease { version: String },
}
