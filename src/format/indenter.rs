/// `XmlIndenter` - Depth-based indentation tracker
///
/// Tracks one nesting-depth counter across a document pass and hands out
/// the indent prefix for each emitted line. There is no scope stack and no
/// parse tree: closing tags dedent, opening tags indent, and unmatched
/// closing tags floor the depth at zero instead of failing.
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::parser::classify::is_opening_tag;

/// Two-space indent unit applied once per nesting level.
pub const INDENT_UNIT: &str = "  ";

/// Deepest nesting level with a precomputed indent prefix.
pub const MAX_CACHED_DEPTH: usize = 64;

/// Precomputed indent prefixes for depths `0..=MAX_CACHED_DEPTH`.
static INDENT_CACHE: LazyLock<Vec<String>> = LazyLock::new(|| {
    (0..=MAX_CACHED_DEPTH)
        .map(|depth| INDENT_UNIT.repeat(depth))
        .collect()
});

/// Indent prefix for a nesting depth.
///
/// Depths within the cache borrow a precomputed string; deeper nesting
/// falls back to direct repetition.
#[must_use]
pub fn indent_str(depth: usize) -> Cow<'static, str> {
    if depth <= MAX_CACHED_DEPTH {
        Cow::Borrowed(INDENT_CACHE[depth].as_str())
    } else {
        Cow::Owned(INDENT_UNIT.repeat(depth))
    }
}

/// Tracks structural nesting depth across one document pass
pub struct XmlIndenter {
    depth: usize,
}

impl XmlIndenter {
    /// Create a tracker starting at depth zero
    #[must_use]
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Indent prefix for the line about to be emitted.
    ///
    /// A closing tag dedents first, floored at zero, so it lands at the
    /// depth of its matching opener.
    pub fn indent_for(&mut self, trimmed: &str) -> Cow<'static, str> {
        if trimmed.starts_with("</") {
            self.depth = self.depth.saturating_sub(1);
        }
        indent_str(self.depth)
    }

    /// Account for the emitted line's effect on the lines that follow.
    ///
    /// An opening tag indents everything up to its closing tag one level
    /// deeper; self-contained, self-closing, comment, and declaration
    /// lines change nothing.
    pub fn advance(&mut self, trimmed: &str) {
        if is_opening_tag(trimmed) {
            self.depth += 1;
        }
    }

    /// Current nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for XmlIndenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_str_cached_depths() {
        assert_eq!(indent_str(0), "");
        assert_eq!(indent_str(1), "  ");
        assert_eq!(indent_str(3), "      ");
        assert_eq!(indent_str(MAX_CACHED_DEPTH).len(), MAX_CACHED_DEPTH * 2);
    }

    #[test]
    fn test_indent_str_beyond_cache() {
        let deep = indent_str(MAX_CACHED_DEPTH + 6);
        assert_eq!(deep.len(), (MAX_CACHED_DEPTH + 6) * 2);
        assert!(deep.chars().all(|c| c == ' '));
    }

    #[test]
    fn test_nested_open_close() {
        let mut indenter = XmlIndenter::new();

        // <a>
        assert_eq!(indenter.indent_for("<a>"), "");
        indenter.advance("<a>");
        assert_eq!(indenter.depth(), 1);

        // <b>
        assert_eq!(indenter.indent_for("<b>"), "  ");
        indenter.advance("<b>");
        assert_eq!(indenter.depth(), 2);

        // </b> dedents before emission
        assert_eq!(indenter.indent_for("</b>"), "  ");
        indenter.advance("</b>");
        assert_eq!(indenter.depth(), 1);

        // </a>
        assert_eq!(indenter.indent_for("</a>"), "");
        indenter.advance("</a>");
        assert_eq!(indenter.depth(), 0);
    }

    #[test]
    fn test_unmatched_closing_floors_at_zero() {
        let mut indenter = XmlIndenter::new();
        assert_eq!(indenter.indent_for("</a>"), "");
        indenter.advance("</a>");
        assert_eq!(indenter.indent_for("</a>"), "");
        assert_eq!(indenter.depth(), 0);
    }

    #[test]
    fn test_self_closing_keeps_depth() {
        let mut indenter = XmlIndenter::new();
        indenter.indent_for("<root>");
        indenter.advance("<root>");

        assert_eq!(indenter.indent_for("<Item Include=\"x.cs\" />"), "  ");
        indenter.advance("<Item Include=\"x.cs\" />");
        assert_eq!(indenter.depth(), 1);
    }

    #[test]
    fn test_self_contained_keeps_depth() {
        let mut indenter = XmlIndenter::new();
        indenter.indent_for("<root>");
        indenter.advance("<root>");

        indenter.indent_for("<Version>1.0</Version>");
        indenter.advance("<Version>1.0</Version>");
        assert_eq!(indenter.depth(), 1);
    }

    #[test]
    fn test_declaration_and_comment_keep_depth() {
        let mut indenter = XmlIndenter::new();
        indenter.indent_for("<?xml version=\"1.0\"?>");
        indenter.advance("<?xml version=\"1.0\"?>");
        assert_eq!(indenter.depth(), 0);

        indenter.indent_for("<!-- header -->");
        indenter.advance("<!-- header -->");
        assert_eq!(indenter.depth(), 0);
    }
}
