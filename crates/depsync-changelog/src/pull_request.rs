use std::sync::LazyLock;

use regex::Regex;

use crate::repository::RepositoryInfo;

/// Stands in for the pull request number until one is known.
pub const PLACEHOLDER: &str = "XXXXX";

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[#(\d+|XXXXX)\]\([^)]*\)").expect("pull request reference pattern is valid")
});

static REFERENCE_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(\s*\[#(?:\d+|XXXXX)\]\([^)]*\)(?:\s*,\s*\[#(?:\d+|XXXXX)\]\([^)]*\))*\s*\)\s*$")
        .expect("reference group pattern is valid")
});

/// Formats `[#<token>](<repo>/pull/<token>)`.
#[must_use]
pub fn format_reference(repository: &RepositoryInfo, token: &str) -> String {
    format!("[#{token}]({})", repository.pull_request_url(token))
}

/// Pull request tokens referenced by an entry, in order of first appearance.
#[must_use]
pub fn extract_references(entry: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for captures in REFERENCE.captures_iter(entry) {
        let token = &captures[1];
        if !tokens.iter().any(|existing| existing == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Entry text without its trailing `([#1](...), [#2](...))` group.
#[must_use]
pub fn strip_references(entry: &str) -> &str {
    match REFERENCE_GROUP.find(entry) {
        Some(group) => &entry[..group.start()],
        None => entry.trim_end(),
    }
}

/// Rewrites the trailing reference group of a single-line entry so it lists
/// its existing tokens once followed by `token` when the entry does not
/// already reference it. References elsewhere in the text are left in place.
#[must_use]
pub fn merge_reference(entry: &str, repository: &RepositoryInfo, token: &str) -> String {
    let body = strip_references(entry);
    let mut tokens = extract_references(&entry[body.len()..]);
    let referenced = tokens.iter().any(|existing| existing == token)
        || extract_references(body).iter().any(|existing| existing == token);
    if !referenced {
        tokens.push(token.to_string());
    }

    if tokens.is_empty() {
        return body.to_string();
    }

    let references = tokens
        .iter()
        .map(|token| format_reference(repository, token))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{body} ({references})")
}
