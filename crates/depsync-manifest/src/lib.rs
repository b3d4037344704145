mod error;
mod manifest;
mod workspace;

pub use error::ManifestError;
pub use manifest::{MANIFEST_FILE, PackageManifest, read_manifest};
pub use workspace::published_name;

pub type Result<T> = std::result::Result<T, ManifestError>;
