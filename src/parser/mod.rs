//! Line classification for XML-style documents.
//!
//! This module decides what kind of markup each trimmed line carries:
//! - [`is_container_element`]: Bare structural tags like `<Project>` or `</ItemGroup>`
//! - [`is_self_contained`]: Complete open-and-close pairs on one line
//! - [`is_opening_tag`]: Tags that increase nesting depth for subsequent lines
//!
//! Classification is line-oriented and never builds a document tree. Attribute
//! values are not inspected here; lines are judged by their delimiters alone.

pub mod classify;

pub use classify::{is_container_element, is_opening_tag, is_self_contained};
