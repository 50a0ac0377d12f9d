//! Content-level cleanup applied before any line processing.
//!
//! Strips a UTF-8 byte-order mark and normalizes all line endings to LF,
//! so the rest of the pipeline only ever sees `\n`.

use std::borrow::Cow;

/// Remove a single leading byte-order mark, if present.
#[must_use]
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Normalize line endings to LF.
///
/// Every `\r\n` pair becomes a single `\n`, then any remaining lone `\r`
/// becomes `\n`. Input without carriage returns is returned borrowed.
#[must_use]
pub fn normalize_line_endings(content: &str) -> Cow<'_, str> {
    if !content.contains('\r') {
        return Cow::Borrowed(content);
    }

    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            result.push('\n');
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

/// Clean raw document text: BOM removal, then line-ending normalization.
///
/// Empty input is returned unchanged.
#[must_use]
pub fn clean_content(content: &str) -> Cow<'_, str> {
    normalize_line_endings(strip_bom(content))
}
