use semver::Version;

use depsync_core::{ChangeCategory, ChangelogSection};

use crate::changelog::Section;

pub(crate) const UNRELEASED: &str = "Unreleased";

pub(crate) fn unreleased_heading() -> String {
    format!("## [{UNRELEASED}]")
}

/// Label between the brackets of a `## [<label>]` heading.
pub(crate) fn heading_label(line: &str) -> Option<&str> {
    line.strip_prefix("## [")?
        .split_once(']')
        .map(|(label, _)| label)
}

pub(crate) fn render<'a>(
    preamble: &str,
    sections: impl Iterator<Item = &'a Section>,
    links: &[String],
) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if !preamble.is_empty() {
        blocks.push(preamble.to_string());
    }

    for section in sections {
        blocks.push(section.heading.clone());

        for category in ChangeCategory::ALL {
            let Some(entries) = section.changes.get(&category) else {
                continue;
            };
            if entries.is_empty() {
                continue;
            }
            blocks.push(format!("### {category}"));
            blocks.push(
                entries
                    .iter()
                    .map(|entry| format!("- {entry}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
    }

    if !links.is_empty() {
        blocks.push(links.join("\n"));
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

/// Byte offset of the heading line of `section` within raw changelog text.
#[must_use]
pub fn find_section_start(content: &str, section: &ChangelogSection) -> Option<usize> {
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        if let Some(label) = heading_label(line.trim_end()) {
            let found = match section {
                ChangelogSection::Unreleased => label == UNRELEASED,
                ChangelogSection::Release(version) => same_version(label, version),
            };
            if found {
                return Some(offset);
            }
        }
        offset += line.len();
    }

    None
}

fn same_version(label: &str, version: &str) -> bool {
    match (Version::parse(label), Version::parse(version)) {
        (Ok(a), Ok(b)) => a == b,
        _ => label == version,
    }
}
