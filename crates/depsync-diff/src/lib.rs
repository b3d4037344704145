mod context;
mod line;
mod scanner;

pub use scanner::{DEFAULT_PACKAGES_DIR, ManifestDiffScanner, PackageChanges, scan_diff};
