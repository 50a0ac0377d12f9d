//! Line classification predicates.
//!
//! Every predicate operates on a trimmed line and answers one structural
//! question. The classification is heuristic and line-oriented: it assumes
//! one tag-related construct per line, which matches hand-formatted XML and
//! MSBuild project files. None of these functions allocate.

/// Check whether a trimmed line is a container element.
///
/// A container is a bare open or close tag with no attributes: at least
/// 3 bytes, starts with `<`, ends with `>`, and contains neither a space
/// nor an `=` anywhere. Container lines are structural brackets and are
/// exempt from deduplication.
#[must_use]
pub fn is_container_element(trimmed: &str) -> bool {
    if trimmed.len() < 3 {
        return false;
    }
    let bytes = trimmed.as_bytes();
    bytes[0] == b'<'
        && bytes[bytes.len() - 1] == b'>'
        && !trimmed.contains(' ')
        && !trimmed.contains('=')
}

/// Check whether a trimmed line is a self-contained element like
/// `<tag>content</tag>`.
///
/// Requires a complete open tag, inline content, and a closing tag on the
/// same line, with no nested tags between them. Minimum form is `<a>b</a>`.
#[must_use]
pub fn is_self_contained(trimmed: &str) -> bool {
    if trimmed.len() < 7 {
        return false;
    }
    let bytes = trimmed.as_bytes();
    if bytes[0] != b'<' || bytes[bytes.len() - 1] != b'>' {
        return false;
    }

    let Some(first_gt) = trimmed.find('>') else {
        return false;
    };
    let Some(last_lt) = trimmed.rfind('<') else {
        return false;
    };
    if first_gt >= last_lt {
        return false;
    }

    // The tail must be a closing tag and the inline content must not open
    // another tag.
    trimmed[last_lt..].starts_with("</") && !trimmed[first_gt + 1..last_lt].contains('<')
}

/// Check whether a trimmed line opens a new nesting level.
///
/// Closing tags (`</`), comments (`<!`), and processing instructions or
/// declarations (`<?`) never do, nor do self-closing (`/>`) or
/// self-contained lines.
#[must_use]
pub fn is_opening_tag(trimmed: &str) -> bool {
    let bytes = trimmed.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'<' {
        return false;
    }
    if matches!(bytes[1], b'/' | b'!' | b'?') {
        return false;
    }
    if trimmed.ends_with("/>") {
        return false;
    }
    !is_self_contained(trimmed)
}
