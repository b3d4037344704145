mod changelog_io;
mod git_provider;
mod manifest_provider;

pub use changelog_io::ChangelogIo;
pub use git_provider::GitProvider;
pub use manifest_provider::ManifestProvider;
