use depsync_core::DependencyKind;

use crate::line::{brace_delta, object_key};

/// Top-level manifest field the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldContext {
    None,
    Direct,
    Peer,
    Dev,
    Other,
}

impl FieldContext {
    fn for_key(key: &str) -> Self {
        match key {
            "dependencies" => Self::Direct,
            "peerDependencies" => Self::Peer,
            "devDependencies" => Self::Dev,
            _ => Self::Other,
        }
    }

    pub(crate) fn dependency_kind(self) -> Option<DependencyKind> {
        match self {
            Self::Direct => Some(DependencyKind::Direct),
            Self::Peer => Some(DependencyKind::Peer),
            Self::None | Self::Dev | Self::Other => None,
        }
    }

    fn is_dependency_block(self) -> bool {
        matches!(self, Self::Direct | Self::Peer | Self::Dev)
    }
}

/// Position inside one side (old or new) of a manifest while walking a hunk.
///
/// `depth` is the object nesting level when it can be derived from the hunk
/// (a hunk that starts at the top of the file). Hunks starting mid-file have
/// an unknown depth until a dependency block opener is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    depth: Option<usize>,
    field: FieldContext,
}

impl Cursor {
    pub(crate) fn at_hunk_start(start_line: Option<usize>) -> Self {
        let depth = match start_line {
            Some(0 | 1) => Some(0),
            _ => None,
        };
        Self {
            depth,
            field: FieldContext::None,
        }
    }

    pub(crate) fn field(&self) -> FieldContext {
        self.field
    }

    pub(crate) fn is_top_level(&self) -> bool {
        match self.depth {
            Some(depth) => depth == 1,
            None => self.field == FieldContext::None,
        }
    }

    pub(crate) fn advance(&mut self, content: &str) {
        match self.depth {
            Some(depth) => self.advance_known(depth, content),
            None => self.advance_unknown(content),
        }
    }

    fn advance_known(&mut self, depth: usize, content: &str) {
        if depth == 1 {
            if let Some((key, opens_object)) = object_key(content) {
                self.field = if opens_object {
                    FieldContext::for_key(key)
                } else {
                    FieldContext::None
                };
            }
        }

        let depth = depth.saturating_add_signed(brace_delta(content));
        if depth <= 1 {
            self.field = FieldContext::None;
        }
        self.depth = Some(depth);
    }

    fn advance_unknown(&mut self, content: &str) {
        let trimmed = content.trim();

        if let Some((key, true)) = object_key(trimmed) {
            let field = FieldContext::for_key(key);
            if field.is_dependency_block() {
                // Dependency blocks only exist at the top level, which pins the depth.
                self.field = field;
                self.depth = Some(1);
                self.advance_known(1, content);
                return;
            }
            if self.field == FieldContext::None {
                self.field = FieldContext::Other;
            }
            return;
        }

        if trimmed == "}" || trimmed == "}," {
            self.field = FieldContext::None;
        }
    }
}
