//! Semantic normalization and fingerprinting.
//!
//! Deduplication must treat lines as equal when they differ only in
//! whitespace outside quoted attribute values or in the quote style used
//! for those values. [`semantic_form`] produces that canonical form and
//! [`fingerprint`] hashes it into the fixed-width key the seen-set stores.
//!
//! The scan is an explicit two-state machine (outside quotes / inside
//! quotes with the active delimiter) so it stays linear on any input.

use std::hash::Hasher;

use fxhash::FxHasher64;

/// Canonical form of a line for deduplication purposes.
///
/// Outside quoted spans, each maximal run of whitespace collapses to one
/// space and both `'` and `"` delimiters are rewritten as `"`. Inside
/// quoted spans, characters are copied verbatim, internal whitespace
/// included. The result is trimmed.
///
/// Lines without any quote character take a fast path that collapses
/// whitespace runs without per-character state.
#[must_use]
pub fn semantic_form(line: &str) -> String {
    if !line.contains('"') && !line.contains('\'') {
        let mut normalized = String::with_capacity(line.len());
        for word in line.split_whitespace() {
            if !normalized.is_empty() {
                normalized.push(' ');
            }
            normalized.push_str(word);
        }
        return normalized;
    }

    let mut normalized = String::with_capacity(line.len());
    let mut in_quotes = false;
    let mut quote_char = '"';
    let mut prev_space = false;

    for c in line.chars() {
        if !in_quotes && (c == '"' || c == '\'') {
            in_quotes = true;
            quote_char = c;
            normalized.push('"');
            prev_space = false;
        } else if in_quotes && c == quote_char {
            in_quotes = false;
            normalized.push('"');
            prev_space = false;
        } else if in_quotes {
            // Quoted content is significant, whitespace included
            normalized.push(c);
            prev_space = false;
        } else if c.is_whitespace() {
            if !prev_space {
                normalized.push(' ');
                prev_space = true;
            }
        } else {
            normalized.push(c);
            prev_space = false;
        }
    }

    normalized.trim().to_string()
}

/// Stable 64-bit fingerprint of a line's semantic form.
///
/// Two lines with equal semantic forms always produce equal fingerprints;
/// collisions between distinct forms are an accepted approximation of the
/// deduplication design. The hash is seed-free, so fingerprints are
/// reproducible across runs and processes.
#[must_use]
pub fn fingerprint(line: &str) -> u64 {
    let mut hasher = FxHasher64::default();
    hasher.write(semantic_form(line).as_bytes());
    hasher.finish()
}
