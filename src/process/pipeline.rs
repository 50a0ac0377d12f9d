//! Single-pass processing pipeline
//!
//! Composes the cleanup, classification, deduplication, and indentation
//! stages into one forward pass over the line sequence:
//! - blank lines are dropped,
//! - non-container lines are fingerprinted and duplicates suppressed,
//! - every kept line is re-emitted with depth-based two-space indentation.

use std::io::{BufRead, Write};

use fxhash::FxHashSet;

use crate::config::Config;
use crate::format::content::clean_content;
use crate::format::indenter::XmlIndenter;
use crate::format::semantic::fingerprint;
use crate::parser::classify::is_container_element;
use crate::warnings::{has_xml_declaration, XML_DECLARATION};
use crate::Result;

/// Average characters per line, used to pre-size the seen-set
const ESTIMATED_LINE_LENGTH: usize = 50;

/// Minimum seen-set capacity
const MIN_HASH_CAPACITY: usize = 256;

/// Maximum seen-set capacity
const MAX_HASH_CAPACITY: usize = 4096;

/// Outcome of processing one document
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessReport {
    /// Number of duplicate lines suppressed
    pub duplicates_removed: usize,
    /// The input had no XML declaration
    pub missing_declaration: bool,
    /// A declaration was injected ahead of the processed text
    pub declaration_added: bool,
}

/// Re-indent a document and drop semantically duplicate lines.
///
/// Accepts full document text in any line-ending style, with or without a
/// leading BOM. Each invocation owns its own seen-set and depth counter,
/// so concurrent calls are independent. Returns the processed text, which
/// always ends in exactly one newline (empty or blank-only input yields
/// just a newline), plus the number of lines removed.
///
/// Malformed nesting never fails: an unmatched closing tag floors the
/// depth at zero and processing continues.
#[must_use]
pub fn normalize_and_deduplicate(content: &str) -> (String, usize) {
    let content = clean_content(content);

    let mut result = String::with_capacity(content.len() + content.len() / 4);
    let seen_capacity =
        (content.len() / ESTIMATED_LINE_LENGTH).clamp(MIN_HASH_CAPACITY, MAX_HASH_CAPACITY);
    let mut seen_elements: FxHashSet<u64> =
        FxHashSet::with_capacity_and_hasher(seen_capacity, Default::default());
    let mut duplicates_removed = 0;
    let mut indenter = XmlIndenter::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Structural brackets repeat legitimately and are never deduplicated
        if !is_container_element(trimmed) {
            let fp = fingerprint(trimmed);
            if !seen_elements.insert(fp) {
                duplicates_removed += 1;
                continue;
            }
        }

        result.push_str(&indenter.indent_for(trimmed));
        result.push_str(trimmed);
        result.push('\n');
        indenter.advance(trimmed);
    }

    if result.is_empty() {
        result.push('\n');
    }

    (result, duplicates_removed)
}

/// Process one document end to end.
///
/// Reads the whole input (which must be valid UTF-8), cleans it, runs the
/// deduplication pass, injects the canonical XML declaration when
/// `fix_warnings` is set and none is present, and writes the final text.
/// The report carries what the caller needs for console output.
pub fn process_document<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &Config,
    _filename: &str,
) -> Result<ProcessReport> {
    let mut buffer = Vec::new();
    let mut reader = input;
    reader.read_to_end(&mut buffer)?;
    let text = String::from_utf8(buffer)?;

    let cleaned = clean_content(&text);
    let missing_declaration = !has_xml_declaration(&cleaned);
    let declaration_added = missing_declaration && config.fix_warnings;

    let (processed, duplicates_removed) = normalize_and_deduplicate(&cleaned);

    // The injected declaration sits above the processed text and takes no
    // part in deduplication or indentation
    if declaration_added {
        output.write_all(XML_DECLARATION.as_bytes())?;
    }
    output.write_all(processed.as_bytes())?;

    Ok(ProcessReport {
        duplicates_removed,
        missing_declaration,
        declaration_added,
    })
}
