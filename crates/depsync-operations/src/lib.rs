mod error;
mod layout;
pub mod matcher;
pub mod operations;
pub mod providers;
pub mod traits;

#[cfg(test)]
pub mod mocks;

pub use error::{OperationError, Result};
pub use layout::{CHANGELOG_FILE, ProjectLayout};
