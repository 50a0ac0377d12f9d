//! XML best-practice warnings.
//!
//! The only check currently performed is for a missing XML declaration.
//! Detection runs on cleaned content; the fix (when requested) prepends
//! [`XML_DECLARATION`] ahead of the processed text.

/// Canonical declaration injected by `--fix-warnings`
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Warning block printed when a document has no XML declaration
pub const MISSING_DECLARATION_WARNING: &str = "\u{26a0}\u{fe0f}  XML Best Practice Warnings:\n  [XML] Missing XML declaration\n    Fix: Add <?xml version=\"1.0\" encoding=\"utf-8\"?> at the top\n";

/// Hint printed when warnings were found but fixes were not requested
pub const FIX_HINT: &str = "Use --fix-warnings flag to automatically apply fixes\n";

/// Confirmation printed after the declaration was injected
pub const APPLIED_FIXES: &str = "\u{1f527} Applied fixes:\n  \u{2713} Added XML declaration\n";

/// Check whether cleaned document text carries an XML declaration.
///
/// The check is a substring search, not an at-start anchor: declarations
/// preceded by comments or whitespace still count, matching the
/// line-oriented heuristics used elsewhere.
#[must_use]
pub fn has_xml_declaration(content: &str) -> bool {
    content.contains("<?xml")
}
