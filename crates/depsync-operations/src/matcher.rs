//! Textual matching of changelog entries against dependency bumps.
//!
//! Entries are free-form markdown written to the convention
//! ``Bump `<dep>` from `<old>` to `<new>` ([#N](...))``; matching is by
//! substring rather than by parsing that convention.

use depsync_core::DependencyChange;

/// Whether `entry` mentions `` `<dependency>` `` at all, regardless of version.
#[must_use]
pub fn references_dependency(entry: &str, dependency: &str) -> bool {
    entry.contains(&format!("`{dependency}`"))
}

/// Whether `entry` already documents this exact bump: it names the
/// dependency in backticks and contains the new version string.
#[must_use]
pub fn matches_change(entry: &str, change: &DependencyChange) -> bool {
    references_dependency(entry, &change.dependency) && entry.contains(&change.new_version)
}

/// Whether any entry documents `change`.
#[must_use]
pub fn is_documented<'a>(entries: impl IntoIterator<Item = &'a str>, change: &DependencyChange) -> bool {
    entries
        .into_iter()
        .any(|entry| matches_change(entry, change))
}
