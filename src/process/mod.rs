//! Document processing pipeline.
//!
//! This module orchestrates the single-pass transformation:
//!
//! - Clean the raw text (strip BOM, normalize line endings)
//! - Walk the lines once, dropping blanks and duplicate non-container lines
//! - Re-indent each surviving line from the running nesting depth
//! - Optionally inject a missing XML declaration
//!
//! Duplicate detection compares whitespace-insensitive fingerprints, so two
//! spellings of the same element collapse to the first occurrence. Container
//! elements are exempt because repeated `<ItemGroup>` sections are legitimate
//! document structure.
//!
//! The main entry point is [`process_document`] which processes a buffered
//! reader and writes output to any `Write` implementation.

pub mod pipeline;

pub use pipeline::{normalize_and_deduplicate, process_document, ProcessReport};
