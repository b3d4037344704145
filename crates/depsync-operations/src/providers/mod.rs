mod changelog;
mod git;
mod manifest;

pub use changelog::FileSystemChangelogIo;
pub use git::Git2Provider;
pub use manifest::FileSystemManifestProvider;
