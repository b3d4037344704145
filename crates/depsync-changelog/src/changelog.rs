use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use semver::Version;

use depsync_core::{ChangeCategory, ChangelogSection};

use crate::error::ChangelogError;
use crate::format::{UNRELEASED, heading_label, render, unreleased_heading};

/// Entries of one section grouped by category, each entry without its `- ` marker.
pub type Changes = IndexMap<ChangeCategory, Vec<String>>;

const TITLE: &str = "# Changelog";

static LINK_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]:\s*(\S+)").expect("link definition pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Section {
    pub(crate) heading: String,
    pub(crate) changes: Changes,
}

impl Section {
    fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            changes: Changes::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SectionRef {
    Unreleased,
    Release(usize),
}

#[derive(Debug, Default)]
struct ParseCursor {
    section: Option<SectionRef>,
    category: Option<ChangeCategory>,
    entry_open: bool,
    in_links: bool,
}

/// A parsed Keep a Changelog document for one package.
///
/// The preamble and trailing link definitions are kept verbatim; sections are
/// re-rendered in canonical layout by the `Display` impl.
#[derive(Debug, Clone)]
pub struct Changelog {
    tag_prefix: String,
    preamble: String,
    unreleased: Option<Section>,
    releases: Vec<(Version, Section)>,
    links: Vec<String>,
}

impl Changelog {
    /// Parses changelog content. `tag_prefix` is the prefix of this package's
    /// release tags (`@scope/name@`); release links must reference those tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is missing, a heading, category or line is
    /// not recognized, a section is duplicated, or a release link does not use
    /// the tag prefix.
    pub fn parse(content: &str, tag_prefix: &str) -> Result<Self, ChangelogError> {
        let mut changelog = Self {
            tag_prefix: tag_prefix.to_string(),
            preamble: String::new(),
            unreleased: None,
            releases: Vec::new(),
            links: Vec::new(),
        };
        let mut preamble: Vec<&str> = Vec::new();
        let mut cursor = ParseCursor::default();

        for (index, raw) in content.lines().enumerate() {
            let number = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if cursor.in_links {
                if line.trim().is_empty() {
                    continue;
                }
                if LINK_DEFINITION.is_match(line) {
                    changelog.push_link(line)?;
                    continue;
                }
                return Err(unrecognized(number, line));
            }

            if line.starts_with("## ") {
                let section = changelog.open_section(number, line)?;
                cursor = ParseCursor {
                    section: Some(section),
                    ..ParseCursor::default()
                };
                continue;
            }

            let Some(section) = cursor.section else {
                preamble.push(line);
                continue;
            };

            if let Some(name) = line.strip_prefix("### ") {
                let category = name.trim().parse::<ChangeCategory>().map_err(|_| {
                    ChangelogError::UnknownCategory {
                        line: number,
                        category: name.trim().to_string(),
                    }
                })?;
                changelog
                    .section_mut(section)
                    .changes
                    .entry(category)
                    .or_default();
                cursor.category = Some(category);
                cursor.entry_open = false;
                continue;
            }

            if let Some(text) = line.strip_prefix("- ") {
                let category = cursor
                    .category
                    .ok_or(ChangelogError::EntryOutsideCategory { line: number })?;
                changelog
                    .section_mut(section)
                    .changes
                    .entry(category)
                    .or_default()
                    .push(text.to_string());
                cursor.entry_open = true;
                continue;
            }

            if line.trim().is_empty() {
                cursor.entry_open = false;
                continue;
            }

            if cursor.entry_open && line.starts_with(char::is_whitespace) {
                if let Some(category) = cursor.category {
                    let entry = changelog
                        .section_mut(section)
                        .changes
                        .get_mut(&category)
                        .and_then(|entries| entries.last_mut());
                    if let Some(entry) = entry {
                        entry.push('\n');
                        entry.push_str(line);
                        continue;
                    }
                }
            }

            if LINK_DEFINITION.is_match(line) {
                cursor.in_links = true;
                changelog.push_link(line)?;
                continue;
            }

            return Err(unrecognized(number, line));
        }

        if !preamble.iter().any(|line| line.trim() == TITLE) {
            return Err(ChangelogError::MissingTitle);
        }
        changelog.preamble = preamble.join("\n").trim().to_string();

        Ok(changelog)
    }

    #[must_use]
    pub fn tag_prefix(&self) -> &str {
        &self.tag_prefix
    }

    #[must_use]
    pub fn has_unreleased(&self) -> bool {
        self.unreleased.is_some()
    }

    /// Changes in the Unreleased section, or `None` if there is no such section.
    #[must_use]
    pub fn unreleased_changes(&self) -> Option<&Changes> {
        self.unreleased.as_ref().map(|section| &section.changes)
    }

    #[must_use]
    pub fn has_release(&self, version: &Version) -> bool {
        self.release(version).is_some()
    }

    /// Changes already filed under a released version.
    #[must_use]
    pub fn release_changes(&self, version: &Version) -> Option<&Changes> {
        self.release(version).map(|section| &section.changes)
    }

    /// Released versions in document order.
    pub fn releases(&self) -> impl Iterator<Item = &Version> {
        self.releases.iter().map(|(version, _)| version)
    }

    /// Changes of the given section, or `None` if the document lacks it.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::VersionParse` if a release version is not valid semver.
    pub fn section_changes(
        &self,
        section: &ChangelogSection,
    ) -> Result<Option<&Changes>, ChangelogError> {
        match section {
            ChangelogSection::Unreleased => Ok(self.unreleased_changes()),
            ChangelogSection::Release(version) => {
                Ok(self.release_changes(&parse_version(version)?))
            }
        }
    }

    /// All entries of the given section across categories.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::VersionParse` if a release version is not valid semver.
    pub fn section_entries(
        &self,
        section: &ChangelogSection,
    ) -> Result<Option<Vec<&str>>, ChangelogError> {
        Ok(self.section_changes(section)?.map(|changes| {
            changes
                .values()
                .flat_map(|entries| entries.iter().map(String::as_str))
                .collect()
        }))
    }

    /// Prepends an entry to a category. `version` selects a release section;
    /// `None` targets Unreleased, which is created when missing.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::MissingRelease` if the document has no section for `version`.
    pub fn add_change(
        &mut self,
        category: ChangeCategory,
        description: impl Into<String>,
        version: Option<&Version>,
    ) -> Result<(), ChangelogError> {
        let section = match version {
            None => self
                .unreleased
                .get_or_insert_with(|| Section::new(unreleased_heading())),
            Some(version) => self
                .releases
                .iter_mut()
                .find(|(v, _)| v == version)
                .map(|(_, section)| section)
                .ok_or_else(|| ChangelogError::MissingRelease {
                    version: version.to_string(),
                })?,
        };

        section
            .changes
            .entry(category)
            .or_default()
            .insert(0, description.into());
        Ok(())
    }

    fn release(&self, version: &Version) -> Option<&Section> {
        self.releases
            .iter()
            .find(|(v, _)| v == version)
            .map(|(_, section)| section)
    }

    fn section_mut(&mut self, section: SectionRef) -> &mut Section {
        match section {
            SectionRef::Unreleased => self
                .unreleased
                .get_or_insert_with(|| Section::new(unreleased_heading())),
            SectionRef::Release(index) => &mut self.releases[index].1,
        }
    }

    fn open_section(&mut self, number: usize, line: &str) -> Result<SectionRef, ChangelogError> {
        let heading = line.trim_end();
        let label = heading_label(heading).ok_or_else(|| ChangelogError::InvalidHeading {
            line: number,
            heading: heading.to_string(),
        })?;

        if label == UNRELEASED {
            if self.unreleased.is_some() {
                return Err(ChangelogError::DuplicateSection {
                    line: number,
                    label: label.to_string(),
                });
            }
            self.unreleased = Some(Section::new(heading));
            return Ok(SectionRef::Unreleased);
        }

        let version = parse_version(label)?;
        if self.has_release(&version) {
            return Err(ChangelogError::DuplicateSection {
                line: number,
                label: label.to_string(),
            });
        }
        self.releases.push((version, Section::new(heading)));
        Ok(SectionRef::Release(self.releases.len() - 1))
    }

    fn push_link(&mut self, line: &str) -> Result<(), ChangelogError> {
        if let Some(captures) = LINK_DEFINITION.captures(line) {
            let label = &captures[1];
            let url = &captures[2];
            if !self.tag_prefix.is_empty() && Version::parse(label).is_ok() {
                let expected_tag = format!("{}{label}", self.tag_prefix);
                if !url.contains(&expected_tag) {
                    return Err(ChangelogError::TagPrefixMismatch {
                        version: label.to_string(),
                        expected_tag,
                    });
                }
            }
        }
        self.links.push(line.trim_end().to_string());
        Ok(())
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = self
            .unreleased
            .iter()
            .chain(self.releases.iter().map(|(_, section)| section));
        f.write_str(&render(&self.preamble, sections, &self.links))
    }
}

fn parse_version(version: &str) -> Result<Version, ChangelogError> {
    Version::parse(version).map_err(|source| ChangelogError::VersionParse {
        version: version.to_string(),
        source,
    })
}

fn unrecognized(line: usize, content: &str) -> ChangelogError {
    ChangelogError::UnrecognizedLine {
        line,
        content: content.to_string(),
    }
}
