mod changelog;
mod error;
mod format;
mod io;
mod pull_request;
mod repository;

pub use changelog::{Changelog, Changes};
pub use error::ChangelogError;
pub use format::find_section_start;
pub use io::{read_changelog, write_changelog};
pub use pull_request::{
    PLACEHOLDER, extract_references, format_reference, merge_reference, strip_references,
};
pub use repository::RepositoryInfo;

pub type Result<T> = std::result::Result<T, ChangelogError>;
