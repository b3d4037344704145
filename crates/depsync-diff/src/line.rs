use std::sync::LazyLock;

use regex::Regex;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("hunk header pattern is valid")
});

static VERSION_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"([^"]+)"\s*:\s*"([^"]+)"\s*,?$"#).expect("entry pattern is valid")
});

static OBJECT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]+)"\s*:\s*(.*)$"#).expect("key pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DiffLine<'a> {
    FileHeader { path: &'a str },
    HunkHeader {
        old_start: Option<usize>,
        new_start: Option<usize>,
    },
    Context(&'a str),
    Removed(&'a str),
    Added(&'a str),
    Other,
}

impl<'a> DiffLine<'a> {
    /// Lines starting with `+`/`-` only carry content inside a hunk; before the
    /// first hunk of a file they are the `---`/`+++` headers.
    pub(crate) fn classify(line: &'a str, in_hunk: bool) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(rest) = line.strip_prefix("diff --git ") {
            return match rest.rfind(" b/") {
                Some(pos) => Self::FileHeader {
                    path: &rest[pos + 3..],
                },
                None => Self::FileHeader { path: "" },
            };
        }

        if line.starts_with("@@ ") {
            let captures = HUNK_HEADER.captures(line);
            let start = |index: usize| {
                captures
                    .as_ref()
                    .and_then(|c| c.get(index))
                    .and_then(|m| m.as_str().parse().ok())
            };
            return Self::HunkHeader {
                old_start: start(1),
                new_start: start(2),
            };
        }

        if !in_hunk {
            return Self::Other;
        }

        match line.as_bytes().first() {
            None => Self::Context(""),
            Some(b' ') => Self::Context(&line[1..]),
            Some(b'-') => Self::Removed(&line[1..]),
            Some(b'+') => Self::Added(&line[1..]),
            Some(_) => Self::Other,
        }
    }
}

/// `"<name>": "<version>"` with an optional trailing comma.
pub(crate) fn version_entry(content: &str) -> Option<(&str, &str)> {
    let captures = VERSION_ENTRY.captures(content.trim())?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

/// Key of a `"<key>": <value>` line and whether the value opens an object.
pub(crate) fn object_key(content: &str) -> Option<(&str, bool)> {
    let captures = OBJECT_KEY.captures(content.trim())?;
    let key = captures.get(1)?.as_str();
    let opens_object = captures
        .get(2)
        .is_some_and(|value| value.as_str().trim_start().starts_with('{'));
    Some((key, opens_object))
}

/// Net change in object nesting, ignoring braces inside string literals.
pub(crate) fn brace_delta(content: &str) -> isize {
    let mut delta = 0;
    let mut in_string = false;
    let mut escaped = false;

    for c in content.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }

    delta
}
