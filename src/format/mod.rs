//! XML text formatting.
//!
//! This module contains the core formatting logic organized into submodules:
//! - [`content`]: Strips byte order marks and normalizes line endings to LF
//! - [`semantic`]: Reduces lines to a whitespace-insensitive form and fingerprints them
//! - [`indenter`]: Tracks element nesting depth and produces indentation strings

pub mod content;
pub mod indenter;
pub mod semantic;

pub use content::{clean_content, normalize_line_endings, strip_bom};
pub use indenter::{indent_str, XmlIndenter, INDENT_UNIT, MAX_CACHED_DEPTH};
pub use semantic::{fingerprint, semantic_form};
